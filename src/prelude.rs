//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    channels::{Channel, ChannelKey, ChannelRegistry, ChannelRepository},
    fixtures::{Fixture, FixtureError},
    forms::{
        ChannelPricingsForm, FormError, FormLifecycle, FormState, ProductVariantGenerationForm,
    },
    orders::{Order, OrderError, OrderItem},
    pricing::{
        ChannelPricing, ChannelPricings,
        reconciler::{channel_codes_to_remove, finalize_submission, reconcile},
    },
    products::{Product, ProductKey, ProductTaxon},
    promotions::{
        Promotion, PromotionRule, PromotionSubject, RuleChecker, RuleError, RuleScope,
        configuration::{ChannelConfiguration, TotalOfItemsFromTaxonConfiguration},
        eligibility::{EligibilityError, RuleCheckerRegistry},
        rules::TotalOfItemsFromTaxonRuleChecker,
    },
    taxonomy::{Taxon, TaxonKey, TaxonRegistry, TaxonRepository, TaxonomyError},
    variants::{ProductVariant, VariantKey},
};
