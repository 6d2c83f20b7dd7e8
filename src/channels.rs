//! Channels

use mockall::automock;
use rusty_money::iso::Currency;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Channel Key
    pub struct ChannelKey;
}

/// A sales channel (storefront, region, marketplace).
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Unique channel code
    pub code: String,

    /// Channel name
    pub name: String,

    /// Currency orders on this channel are placed in
    pub base_currency: &'static Currency,
}

impl Channel {
    /// Create a new channel.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        base_currency: &'static Currency,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            base_currency,
        }
    }
}

/// Source of truth for the set of channels known to the system.
#[automock]
pub trait ChannelRepository {
    /// Return every known channel.
    fn find_all(&self) -> Vec<Channel>;
}

impl<T: ChannelRepository + ?Sized> ChannelRepository for &T {
    fn find_all(&self) -> Vec<Channel> {
        (**self).find_all()
    }
}

/// In-memory channel store.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: SlotMap<ChannelKey, Channel>,
    order: Vec<ChannelKey>,
}

impl ChannelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a channel, replacing any existing channel with the same code.
    pub fn insert(&mut self, channel: Channel) -> ChannelKey {
        if let Some(key) = self.key_by_code(&channel.code)
            && let Some(existing) = self.channels.get_mut(key)
        {
            *existing = channel;

            return key;
        }

        let key = self.channels.insert(channel);

        self.order.push(key);

        key
    }

    /// Get a channel by key.
    pub fn get(&self, key: ChannelKey) -> Option<&Channel> {
        self.channels.get(key)
    }

    /// Find a channel by code.
    pub fn find_by_code(&self, code: &str) -> Option<&Channel> {
        self.key_by_code(code).and_then(|key| self.channels.get(key))
    }

    /// Remove a channel by code, returning it if it existed.
    pub fn remove_by_code(&mut self, code: &str) -> Option<Channel> {
        let key = self.key_by_code(code)?;

        self.order.retain(|existing| *existing != key);
        self.channels.remove(key)
    }

    /// Iterate over the channels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.order.iter().filter_map(|key| self.channels.get(*key))
    }

    /// Number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether the registry holds no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    fn key_by_code(&self, code: &str) -> Option<ChannelKey> {
        self.order.iter().copied().find(|key| {
            self.channels
                .get(*key)
                .is_some_and(|channel| channel.code == code)
        })
    }
}

impl ChannelRepository for ChannelRegistry {
    fn find_all(&self) -> Vec<Channel> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, USD};

    use super::*;

    fn registry() -> ChannelRegistry {
        let mut registry = ChannelRegistry::new();

        registry.insert(Channel::new("WEB_US", "Web US", USD));
        registry.insert(Channel::new("WEB_EU", "Web EU", EUR));

        registry
    }

    #[test]
    fn find_all_preserves_insertion_order() {
        let codes: Vec<String> = registry()
            .find_all()
            .into_iter()
            .map(|channel| channel.code)
            .collect();

        assert_eq!(codes, vec!["WEB_US", "WEB_EU"]);
    }

    #[test]
    fn get_returns_channel_by_key() {
        let mut registry = ChannelRegistry::new();
        let key = registry.insert(Channel::new("WEB_US", "Web US", USD));

        assert_eq!(
            registry.get(key).map(|channel| channel.code.as_str()),
            Some("WEB_US")
        );

        registry.remove_by_code("WEB_US");

        assert!(registry.get(key).is_none());
    }

    #[test]
    fn insert_replaces_channel_with_same_code() {
        let mut registry = registry();

        registry.insert(Channel::new("WEB_US", "United States", USD));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry
                .find_by_code("WEB_US")
                .map(|channel| channel.name.as_str()),
            Some("United States")
        );
    }

    #[test]
    fn remove_by_code_drops_channel() {
        let mut registry = registry();

        let removed = registry.remove_by_code("WEB_US");

        assert_eq!(
            removed.map(|channel| channel.code),
            Some("WEB_US".to_string())
        );
        assert!(registry.find_by_code("WEB_US").is_none());
        assert_eq!(registry.find_all().len(), 1);
    }

    #[test]
    fn remove_missing_code_is_noop() {
        let mut registry = registry();

        assert!(registry.remove_by_code("MOBILE").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_registry_has_no_channels() {
        let registry = ChannelRegistry::new();

        assert!(registry.is_empty());
        assert!(registry.find_all().is_empty());
    }
}
