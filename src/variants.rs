//! Product Variants

use slotmap::new_key_type;

use crate::{
    pricing::{ChannelPricing, ChannelPricings},
    products::ProductKey,
};

new_key_type! {
    /// Product Variant Key
    pub struct VariantKey;
}

/// A purchasable variant of a product, owning its per-channel prices.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant<'a> {
    /// Unique variant code
    pub code: String,

    /// Product the variant belongs to
    pub product: ProductKey,

    channel_pricings: ChannelPricings<'a>,
}

impl<'a> ProductVariant<'a> {
    /// Create a variant without any channel pricings.
    pub fn new(code: impl Into<String>, product: ProductKey) -> Self {
        Self {
            code: code.into(),
            product,
            channel_pricings: ChannelPricings::new(),
        }
    }

    /// Channel pricings of the variant.
    pub fn channel_pricings(&self) -> &ChannelPricings<'a> {
        &self.channel_pricings
    }

    /// Replace the channel pricings of the variant.
    pub fn set_channel_pricings(&mut self, channel_pricings: ChannelPricings<'a>) {
        self.channel_pricings = channel_pricings;
    }

    /// Attach a single channel pricing, keyed by its channel code.
    ///
    /// Pricings without a channel code are ignored.
    pub fn add_channel_pricing(&mut self, channel_pricing: ChannelPricing<'a>) {
        if let Some(code) = channel_pricing.channel_code().map(ToString::to_string) {
            self.channel_pricings.insert(code, channel_pricing);
        }
    }

    /// Pricing of the variant on the given channel.
    pub fn channel_pricing_for_channel(&self, channel_code: &str) -> Option<&ChannelPricing<'a>> {
        self.channel_pricings.get(channel_code)
    }
}
