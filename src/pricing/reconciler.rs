//! Channel Pricing Reconciliation
//!
//! Keeps a variant's channel pricings in step with the set of known channels: one entry per
//! channel on load, and only priced entries, bound to their channel and variant, on submission.

use tracing::{debug, trace};

use crate::{
    channels::Channel,
    pricing::{ChannelPricing, ChannelPricings},
    variants::VariantKey,
};

/// Channel codes present in `current` but absent from `all_channels`, in `current` order.
pub fn channel_codes_to_remove<'c>(
    current: impl IntoIterator<Item = &'c str>,
    all_channels: &[Channel],
) -> Vec<String> {
    current
        .into_iter()
        .filter(|code| !all_channels.iter().any(|channel| channel.code == *code))
        .map(ToString::to_string)
        .collect()
}

/// Reconcile existing entries against the known channels.
///
/// Entries for channels that no longer exist are dropped, then an empty entry is appended for
/// every channel without one, in channel order. Prices of surviving entries are untouched.
#[must_use]
pub fn reconcile<'a>(
    mut existing: ChannelPricings<'a>,
    all_channels: &[Channel],
) -> ChannelPricings<'a> {
    let stale = channel_codes_to_remove(existing.codes(), all_channels);

    for code in &stale {
        existing.remove(code);
    }

    let mut added = Vec::new();

    for channel in all_channels {
        if existing.has(&channel.code) {
            continue;
        }

        existing.insert(
            channel.code.clone(),
            ChannelPricing::for_channel(channel.code.clone()),
        );
        added.push(channel.code.as_str());
    }

    debug!(
        removed = ?stale,
        added = ?added,
        entries = existing.len(),
        "reconciled channel pricings"
    );

    existing
}

/// Finalize submitted entries for the owning variant.
///
/// Entries without a price are discarded. Every remaining entry is bound to the channel code it
/// was submitted under and to `owner`.
#[must_use]
pub fn finalize_submission(
    mut submitted: ChannelPricings<'_>,
    owner: VariantKey,
) -> ChannelPricings<'_> {
    submitted.retain(|code, pricing| {
        if pricing.price().is_none() {
            trace!(channel_code = code, "discarding unpriced channel pricing");

            return false;
        }

        pricing.set_channel_code(code);
        pricing.set_product_variant(owner);

        true
    });

    submitted
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{EUR, USD},
    };
    use slotmap::SlotMap;

    use super::*;

    fn channels(codes: &[&str]) -> Vec<Channel> {
        codes
            .iter()
            .map(|code| Channel::new(*code, *code, USD))
            .collect()
    }

    fn priced(minor: i64) -> ChannelPricing<'static> {
        ChannelPricing::with_price(Money::from_minor(minor, USD))
    }

    #[test]
    fn codes_to_remove_is_set_difference() {
        let all = channels(&["WEB_US", "WEB_EU"]);

        let stale = channel_codes_to_remove(["WEB_US", "MOBILE", "POS"], &all);

        assert_eq!(stale, vec!["MOBILE", "POS"]);
    }

    #[test]
    fn codes_to_remove_with_empty_inputs_is_empty() {
        assert!(channel_codes_to_remove(std::iter::empty(), &channels(&["WEB_US"])).is_empty());
        assert!(channel_codes_to_remove(std::iter::empty(), &[]).is_empty());
    }

    #[test]
    fn codes_to_remove_with_no_channels_removes_everything() {
        let stale = channel_codes_to_remove(["WEB_US", "WEB_EU"], &[]);

        assert_eq!(stale, vec!["WEB_US", "WEB_EU"]);
    }

    #[test]
    fn reconcile_creates_one_entry_per_channel() {
        let all = channels(&["WEB_US", "WEB_EU", "MOBILE"]);

        let pricings = reconcile(ChannelPricings::new(), &all);

        assert_eq!(
            pricings.codes().collect::<Vec<_>>(),
            vec!["WEB_US", "WEB_EU", "MOBILE"]
        );
        assert!(
            pricings
                .iter()
                .all(|(code, pricing)| pricing.channel_code() == Some(code)
                    && pricing.price().is_none())
        );
    }

    #[test]
    fn reconcile_drops_stale_and_keeps_prices() {
        let existing: ChannelPricings<'_> = [
            ("WEB_US", priced(1000)),
            ("RETIRED", priced(500)),
            ("WEB_EU", ChannelPricing::with_price(Money::from_minor(900, EUR))),
        ]
        .into_iter()
        .collect();

        let pricings = reconcile(existing, &channels(&["WEB_EU", "WEB_US", "MOBILE"]));

        assert_eq!(
            pricings.codes().collect::<Vec<_>>(),
            vec!["WEB_US", "WEB_EU", "MOBILE"]
        );
        assert_eq!(
            pricings.get("WEB_US").and_then(ChannelPricing::price),
            Some(&Money::from_minor(1000, USD))
        );
        assert_eq!(
            pricings.get("WEB_EU").and_then(ChannelPricing::price),
            Some(&Money::from_minor(900, EUR))
        );
        assert!(!pricings.has("RETIRED"));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let all = channels(&["WEB_US", "WEB_EU"]);
        let existing: ChannelPricings<'_> =
            [("WEB_US", priced(1000)), ("OLD", priced(1))].into_iter().collect();

        let once = reconcile(existing, &all);
        let twice = reconcile(once.clone(), &all);

        assert_eq!(once, twice);
    }

    #[test]
    fn reconcile_without_channels_empties_entries() {
        let existing: ChannelPricings<'_> = [("WEB_US", priced(1000))].into_iter().collect();

        assert!(reconcile(existing, &[]).is_empty());
    }

    #[test]
    fn finalize_discards_unpriced_and_binds_the_rest() {
        let mut variants = SlotMap::<VariantKey, ()>::with_key();
        let owner = variants.insert(());

        let submitted: ChannelPricings<'_> = [
            ("WEB_US", priced(1999)),
            ("WEB_EU", ChannelPricing::default()),
            ("MOBILE", priced(1799)),
        ]
        .into_iter()
        .collect();

        let finalized = finalize_submission(submitted, owner);

        assert_eq!(finalized.codes().collect::<Vec<_>>(), vec!["WEB_US", "MOBILE"]);

        for (code, pricing) in finalized.iter() {
            assert!(pricing.price().is_some());
            assert_eq!(pricing.channel_code(), Some(code));
            assert_eq!(pricing.product_variant(), Some(owner));
        }
    }

    #[test]
    fn finalize_overwrites_channel_code_with_key() {
        let mut variants = SlotMap::<VariantKey, ()>::with_key();
        let owner = variants.insert(());

        let mut pricing = priced(100);
        pricing.set_channel_code("SOMEWHERE_ELSE");

        let finalized = finalize_submission([("WEB_US", pricing)].into_iter().collect(), owner);

        assert_eq!(
            finalized.get("WEB_US").and_then(ChannelPricing::channel_code),
            Some("WEB_US")
        );
    }

    #[test]
    fn finalize_with_no_prices_is_empty() {
        let submitted: ChannelPricings<'_> = [
            ("WEB_US", ChannelPricing::for_channel("WEB_US")),
            ("WEB_EU", ChannelPricing::for_channel("WEB_EU")),
        ]
        .into_iter()
        .collect();

        assert!(finalize_submission(submitted, VariantKey::default()).is_empty());
    }
}
