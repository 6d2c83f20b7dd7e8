//! Storefront
//!
//! Storefront is the product-pricing and promotion-rule layer of an e-commerce platform: per-channel
//! variant pricing with channel reconciliation, and channel-aware promotion eligibility rules.

pub mod channels;
pub mod fixtures;
pub mod forms;
pub mod logging;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod report;
pub mod taxonomy;
pub mod variants;
