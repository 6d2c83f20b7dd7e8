//! Promotion Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::promotions::{Promotion, PromotionRule};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promotion code -> promotion fixture
    pub promotions: FxHashMap<String, PromotionFixture>,
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion name
    pub name: String,

    /// Promotion rules
    #[serde(default)]
    pub rules: Vec<PromotionRule>,
}

impl PromotionFixture {
    /// Convert into a [`Promotion`] with the given code.
    pub fn into_promotion(self, code: String) -> Promotion {
        Promotion {
            code,
            name: self.name,
            rules: self.rules,
        }
    }
}
