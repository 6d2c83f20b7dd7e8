//! Order Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Map of order key -> order fixture
    pub orders: FxHashMap<String, OrderFixture>,
}

/// Order Fixture
#[derive(Debug, Clone, Deserialize)]
pub struct OrderFixture {
    /// Order number
    pub number: String,

    /// Code of the channel the order was placed on
    pub channel: String,

    /// Order lines
    #[serde(default)]
    pub items: Vec<OrderItemFixture>,
}

/// Order Item Fixture
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemFixture {
    /// Product code
    pub product: String,

    /// Unit price (e.g., "50.00 USD")
    pub unit_price: String,

    /// Quantity ordered
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Line total after adjustments; computed from unit price and quantity when absent
    #[serde(default)]
    pub total: Option<String>,
}

fn default_quantity() -> u32 {
    1
}
