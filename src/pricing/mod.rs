//! Channel Pricing
//!
//! Per-channel prices of a product variant, kept as an ordered collection keyed by channel code.

use rusty_money::{Money, iso::Currency};

use crate::variants::VariantKey;

pub mod reconciler;

/// The price of a product variant on one channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPricing<'a> {
    channel_code: Option<String>,
    product_variant: Option<VariantKey>,
    price: Option<Money<'a, Currency>>,
    original_price: Option<Money<'a, Currency>>,
}

impl<'a> ChannelPricing<'a> {
    /// Create an empty pricing for a channel, with no price set yet.
    pub fn for_channel(channel_code: impl Into<String>) -> Self {
        Self {
            channel_code: Some(channel_code.into()),
            ..Self::default()
        }
    }

    /// Create a pricing carrying only a price. Channel and variant are bound on submission.
    pub fn with_price(price: Money<'a, Currency>) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    /// Channel code the pricing is bound to.
    pub fn channel_code(&self) -> Option<&str> {
        self.channel_code.as_deref()
    }

    /// Bind the pricing to a channel.
    pub fn set_channel_code(&mut self, channel_code: impl Into<String>) {
        self.channel_code = Some(channel_code.into());
    }

    /// Variant owning the pricing.
    pub fn product_variant(&self) -> Option<VariantKey> {
        self.product_variant
    }

    /// Bind the pricing to its owning variant.
    pub fn set_product_variant(&mut self, variant: VariantKey) {
        self.product_variant = Some(variant);
    }

    /// Price on the channel, if set.
    pub fn price(&self) -> Option<&Money<'a, Currency>> {
        self.price.as_ref()
    }

    /// Set or clear the price.
    pub fn set_price(&mut self, price: Option<Money<'a, Currency>>) {
        self.price = price;
    }

    /// Price before any reduction, shown struck through on the storefront.
    pub fn original_price(&self) -> Option<&Money<'a, Currency>> {
        self.original_price.as_ref()
    }

    /// Set or clear the original price.
    pub fn set_original_price(&mut self, original_price: Option<Money<'a, Currency>>) {
        self.original_price = original_price;
    }

    /// Whether the price is discounted relative to the original price.
    pub fn is_price_reduced(&self) -> bool {
        match (&self.price, &self.original_price) {
            (Some(price), Some(original)) => {
                original.to_minor_units() > price.to_minor_units()
            }
            _ => false,
        }
    }
}

/// Ordered collection of channel pricings, at most one per channel code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPricings<'a> {
    entries: Vec<(String, ChannelPricing<'a>)>,
}

impl<'a> ChannelPricings<'a> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an entry exists for the channel code.
    pub fn has(&self, channel_code: &str) -> bool {
        self.position(channel_code).is_some()
    }

    /// Entry for the channel code.
    pub fn get(&self, channel_code: &str) -> Option<&ChannelPricing<'a>> {
        self.entries
            .iter()
            .find(|(code, _)| code == channel_code)
            .map(|(_, pricing)| pricing)
    }

    /// Entry for the channel code, mutably.
    pub fn get_mut(&mut self, channel_code: &str) -> Option<&mut ChannelPricing<'a>> {
        self.entries
            .iter_mut()
            .find(|(code, _)| code == channel_code)
            .map(|(_, pricing)| pricing)
    }

    /// Insert an entry, replacing an existing entry for the same code in place.
    pub fn insert(&mut self, channel_code: impl Into<String>, pricing: ChannelPricing<'a>) {
        let channel_code = channel_code.into();

        if let Some(existing) = self.get_mut(&channel_code) {
            *existing = pricing;
        } else {
            self.entries.push((channel_code, pricing));
        }
    }

    /// Remove the entry for the channel code.
    pub fn remove(&mut self, channel_code: &str) -> Option<ChannelPricing<'a>> {
        let position = self.position(channel_code)?;

        Some(self.entries.remove(position).1)
    }

    /// Channel codes in collection order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    /// Iterate over `(channel code, pricing)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChannelPricing<'a>)> {
        self.entries
            .iter()
            .map(|(code, pricing)| (code.as_str(), pricing))
    }

    /// Keep only the entries for which the predicate holds.
    pub fn retain(&mut self, mut predicate: impl FnMut(&str, &mut ChannelPricing<'a>) -> bool) {
        self.entries
            .retain_mut(|(code, pricing)| predicate(code, pricing));
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, channel_code: &str) -> Option<usize> {
        self.entries.iter().position(|(code, _)| code == channel_code)
    }
}

impl<'a, S: Into<String>> FromIterator<(S, ChannelPricing<'a>)> for ChannelPricings<'a> {
    fn from_iter<I: IntoIterator<Item = (S, ChannelPricing<'a>)>>(iter: I) -> Self {
        let mut pricings = Self::new();

        for (code, pricing) in iter {
            pricings.insert(code, pricing);
        }

        pricings
    }
}

impl<'a> IntoIterator for ChannelPricings<'a> {
    type Item = (String, ChannelPricing<'a>);
    type IntoIter = std::vec::IntoIter<(String, ChannelPricing<'a>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
