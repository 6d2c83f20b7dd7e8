//! Catalog Fixtures
//!
//! Channels, taxons, products and variants.

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for channels in YAML
#[derive(Debug, Deserialize)]
pub struct ChannelsFixture {
    /// Channels, in the order the storefront lists them
    pub channels: Vec<ChannelFixture>,
}

/// Channel Fixture
#[derive(Debug, Deserialize)]
pub struct ChannelFixture {
    /// Channel code
    pub code: String,

    /// Channel name
    pub name: String,

    /// ISO currency code (e.g., "USD")
    pub currency: String,
}

/// Wrapper for taxons in YAML
#[derive(Debug, Deserialize)]
pub struct TaxonsFixture {
    /// Taxons
    pub taxons: Vec<TaxonFixture>,
}

/// Taxon Fixture
#[derive(Debug, Deserialize)]
pub struct TaxonFixture {
    /// Taxon code
    pub code: String,

    /// Taxon name
    pub name: String,
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product code -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Codes of the taxons the product is classified under; a code may repeat
    #[serde(default)]
    pub taxons: Vec<String>,
}

/// Wrapper for variants in YAML
#[derive(Debug, Deserialize)]
pub struct VariantsFixture {
    /// Map of variant code -> variant fixture
    pub variants: FxHashMap<String, VariantFixture>,
}

/// Variant Fixture
#[derive(Debug, Deserialize)]
pub struct VariantFixture {
    /// Code of the product the variant belongs to
    pub product: String,

    /// Map of channel code -> price (e.g., "49.99 USD")
    #[serde(default)]
    pub prices: FxHashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_taxons_default_to_empty() -> TestResult {
        let fixture: ProductFixture = serde_norway::from_str("name: Longsword\n")?;

        assert!(fixture.taxons.is_empty());

        Ok(())
    }

    #[test]
    fn variant_requires_product() {
        let result: Result<VariantFixture, _> = serde_norway::from_str("prices: {}\n");

        assert!(result.is_err());
    }
}
