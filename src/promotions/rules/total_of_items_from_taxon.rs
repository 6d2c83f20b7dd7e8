//! Total Of Items From Taxon Rule
//!
//! Eligible when the items of an order classified under a configured taxon total at least a
//! configured amount. Configured per channel; the order's channel selects the configuration.

use rusty_money::Money;
use tracing::debug;

use crate::{
    promotions::{
        PromotionSubject, RuleChecker, RuleError, RuleScope,
        configuration::{ChannelConfiguration, TotalOfItemsFromTaxonConfiguration},
    },
    taxonomy::TaxonRepository,
};

/// Rule type name used in promotion configuration.
pub const TYPE: &str = "total_of_items_from_taxon";

/// Checks that items from a taxon reach a spend threshold.
#[derive(Debug)]
pub struct TotalOfItemsFromTaxonRuleChecker<R: TaxonRepository> {
    taxons: R,
}

impl<R: TaxonRepository> TotalOfItemsFromTaxonRuleChecker<R> {
    /// Create a checker resolving taxons through the given repository.
    pub fn new(taxons: R) -> Self {
        Self { taxons }
    }
}

impl<R: TaxonRepository> RuleChecker for TotalOfItemsFromTaxonRuleChecker<R> {
    type Configuration = ChannelConfiguration<TotalOfItemsFromTaxonConfiguration>;

    fn scope(&self) -> RuleScope {
        RuleScope::Channel
    }

    #[tracing::instrument(
        name = "promotions.rules.total_of_items_from_taxon",
        skip_all,
        fields(subject_type = subject.subject_type())
    )]
    fn is_eligible(
        &self,
        subject: &dyn PromotionSubject,
        configuration: &Self::Configuration,
    ) -> Result<bool, RuleError> {
        let order = subject
            .as_order()
            .ok_or(RuleError::UnsupportedSubject(subject.subject_type()))?;

        let channel_code = order.channel().code.as_str();

        let Some(channel_configuration) = configuration.for_channel(channel_code) else {
            debug!(channel_code, "no configuration for channel");

            return Ok(false);
        };

        let taxon_code = channel_configuration
            .taxon
            .as_deref()
            .filter(|code| !code.is_empty());

        let (Some(taxon_code), Some(amount)) = (taxon_code, channel_configuration.amount) else {
            debug!(channel_code, "incomplete configuration for channel");

            return Ok(false);
        };

        let Some(taxon) = self.taxons.find_one_by_code(taxon_code) else {
            debug!(channel_code, taxon_code, "configured taxon does not exist");

            return Ok(false);
        };

        let total = order
            .items()
            .iter()
            .filter(|item| item.product().has_taxon(&taxon))
            .try_fold(Money::from_minor(0, order.currency()), |acc, item| {
                acc.add(*item.total())
            })?;

        let total_minor = total.to_minor_units();
        let eligible = total_minor >= amount;

        debug!(
            channel_code,
            taxon_code,
            total = total_minor,
            amount,
            eligible,
            "checked total of items from taxon"
        );

        Ok(eligible)
    }
}
