//! Taxonomy
//!
//! Taxons are the category nodes products are classified under. Promotion rules resolve taxons
//! by code through a [`TaxonRepository`]; [`TaxonRegistry`] is the in-memory implementation.

use mockall::automock;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Taxon Key
    pub struct TaxonKey;
}

/// Errors raised while building a taxonomy.
#[derive(Debug, Error, PartialEq)]
pub enum TaxonomyError {
    /// A taxon with the given code is already registered.
    #[error("taxon code {0} is already registered")]
    DuplicateCode(String),
}

/// A category node.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxon {
    /// Taxon key
    pub key: TaxonKey,

    /// Unique taxon code
    pub code: String,

    /// Taxon name
    pub name: String,
}

/// Lookup of taxons by code.
#[automock]
pub trait TaxonRepository {
    /// Find the taxon with the given code, if any.
    fn find_one_by_code(&self, code: &str) -> Option<Taxon>;
}

impl<T: TaxonRepository + ?Sized> TaxonRepository for &T {
    fn find_one_by_code(&self, code: &str) -> Option<Taxon> {
        (**self).find_one_by_code(code)
    }
}

/// In-memory taxon store.
#[derive(Debug, Default)]
pub struct TaxonRegistry {
    taxons: SlotMap<TaxonKey, Taxon>,
    codes: FxHashMap<String, TaxonKey>,
}

impl TaxonRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a taxon.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::DuplicateCode`] if a taxon with the same code already exists.
    pub fn insert(
        &mut self,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<TaxonKey, TaxonomyError> {
        let code = code.into();

        if self.codes.contains_key(&code) {
            return Err(TaxonomyError::DuplicateCode(code));
        }

        let name = name.into();
        let key = self.taxons.insert_with_key(|key| Taxon {
            key,
            code: code.clone(),
            name,
        });

        self.codes.insert(code, key);

        Ok(key)
    }

    /// Get a taxon by key.
    pub fn get(&self, key: TaxonKey) -> Option<&Taxon> {
        self.taxons.get(key)
    }

    /// Get a taxon key by code.
    pub fn key(&self, code: &str) -> Option<TaxonKey> {
        self.codes.get(code).copied()
    }

    /// Number of taxons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.taxons.len()
    }

    /// Whether the registry holds no taxons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taxons.is_empty()
    }
}

impl TaxonRepository for TaxonRegistry {
    fn find_one_by_code(&self, code: &str) -> Option<Taxon> {
        self.key(code)
            .and_then(|key| self.taxons.get(key))
            .cloned()
    }
}
