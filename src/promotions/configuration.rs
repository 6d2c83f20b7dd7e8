//! Rule Configuration

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_norway::Value;
use tracing::warn;

/// Per-channel rule configuration, keyed by channel code.
///
/// Each channel entry is deserialized on its own. An entry that doesn't fit `T` is left out, so
/// the rule treats that channel as unconfigured while other channels keep their configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfiguration<T> {
    channels: FxHashMap<String, T>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ChannelConfiguration<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = FxHashMap::<String, Value>::deserialize(deserializer)?;

        let channels = raw
            .into_iter()
            .filter_map(|(channel_code, value)| match serde_norway::from_value(value) {
                Ok(configuration) => Some((channel_code, configuration)),
                Err(error) => {
                    warn!(
                        channel_code = channel_code.as_str(),
                        %error,
                        "malformed channel configuration, channel is not configured"
                    );

                    None
                }
            })
            .collect();

        Ok(Self { channels })
    }
}

impl<T> ChannelConfiguration<T> {
    /// Create a configuration with no channels.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: FxHashMap::default(),
        }
    }

    /// Add the configuration for a channel.
    #[must_use]
    pub fn with(mut self, channel_code: impl Into<String>, configuration: T) -> Self {
        self.insert(channel_code, configuration);
        self
    }

    /// Set the configuration for a channel.
    pub fn insert(&mut self, channel_code: impl Into<String>, configuration: T) {
        self.channels.insert(channel_code.into(), configuration);
    }

    /// Configuration for the channel, if any.
    pub fn for_channel(&self, channel_code: &str) -> Option<&T> {
        self.channels.get(channel_code)
    }

    /// Number of configured channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<T> Default for ChannelConfiguration<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Into<String>, T> FromIterator<(S, T)> for ChannelConfiguration<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            channels: iter
                .into_iter()
                .map(|(code, configuration)| (code.into(), configuration))
                .collect(),
        }
    }
}

/// Configuration of the "total of items from taxon" rule on one channel.
///
/// Both fields are required for the rule to apply. They are optional here so that incomplete
/// configuration can be loaded and treated as "rule does not apply".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TotalOfItemsFromTaxonConfiguration {
    /// Code of the taxon whose items are totalled
    pub taxon: Option<String>,

    /// Minimum total, in minor units
    pub amount: Option<i64>,
}

impl TotalOfItemsFromTaxonConfiguration {
    /// Create a complete configuration.
    pub fn new(taxon: impl Into<String>, amount: i64) -> Self {
        Self {
            taxon: Some(taxon.into()),
            amount: Some(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn deserializes_channel_map_from_yaml() -> TestResult {
        let yaml = "WEB_US:\n  taxon: bows\n  amount: 10000\nWEB_EU:\n  amount: 4000\n";
        let configuration: ChannelConfiguration<TotalOfItemsFromTaxonConfiguration> =
            serde_norway::from_str(yaml)?;

        assert_eq!(configuration.len(), 2);
        assert_eq!(
            configuration.for_channel("WEB_US"),
            Some(&TotalOfItemsFromTaxonConfiguration::new("bows", 10_000))
        );
        assert_eq!(
            configuration.for_channel("WEB_EU"),
            Some(&TotalOfItemsFromTaxonConfiguration {
                taxon: None,
                amount: Some(4000),
            })
        );

        Ok(())
    }

    #[test]
    fn malformed_channel_entry_is_left_out() -> TestResult {
        let yaml = "WEB_US:\n  taxon: bows\n  amount: 10000\nWEB_EU:\n  taxon: bows\n  amount: lots\n";
        let configuration: ChannelConfiguration<TotalOfItemsFromTaxonConfiguration> =
            serde_norway::from_str(yaml)?;

        assert_eq!(configuration.len(), 1);
        assert_eq!(
            configuration.for_channel("WEB_US"),
            Some(&TotalOfItemsFromTaxonConfiguration::new("bows", 10_000))
        );
        assert!(configuration.for_channel("WEB_EU").is_none());

        Ok(())
    }

    #[test]
    fn non_map_configuration_is_an_error() {
        let result: Result<ChannelConfiguration<TotalOfItemsFromTaxonConfiguration>, _> =
            serde_norway::from_str("- WEB_US\n");

        assert!(result.is_err());
    }

    #[test]
    fn builder_and_collect_agree() {
        let built = ChannelConfiguration::new()
            .with("WEB_US", TotalOfItemsFromTaxonConfiguration::new("bows", 1));
        let collected: ChannelConfiguration<_> =
            [("WEB_US", TotalOfItemsFromTaxonConfiguration::new("bows", 1))]
                .into_iter()
                .collect();

        assert_eq!(built, collected);
    }

    #[test]
    fn missing_channel_has_no_configuration() {
        let configuration = ChannelConfiguration::<TotalOfItemsFromTaxonConfiguration>::default();

        assert!(configuration.is_empty());
        assert!(configuration.for_channel("WEB_US").is_none());
    }
}
