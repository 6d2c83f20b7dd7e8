//! Products

use slotmap::new_key_type;
use smallvec::SmallVec;

use crate::taxonomy::{Taxon, TaxonKey};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Link between a product and a taxon it is classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductTaxon {
    /// Linked taxon
    pub taxon: TaxonKey,

    /// Position of the product within the taxon
    pub position: u32,
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique product code
    pub code: String,

    /// Product name
    pub name: String,

    product_taxons: SmallVec<[ProductTaxon; 4]>,
}

impl Product {
    /// Create a product that is not classified under any taxon.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            product_taxons: SmallVec::new(),
        }
    }

    /// Classify the product under a taxon at the given position.
    ///
    /// A product can be linked to the same taxon more than once, at distinct positions.
    /// Adding an identical link again is a no-op.
    pub fn add_product_taxon(&mut self, taxon: TaxonKey, position: u32) {
        let product_taxon = ProductTaxon { taxon, position };

        if !self.product_taxons.contains(&product_taxon) {
            self.product_taxons.push(product_taxon);
        }
    }

    /// All taxon links of the product.
    pub fn product_taxons(&self) -> &[ProductTaxon] {
        &self.product_taxons
    }

    /// Links of the product to the given taxon.
    #[must_use]
    pub fn filter_product_taxons_by_taxon(&self, taxon: &Taxon) -> SmallVec<[ProductTaxon; 4]> {
        self.product_taxons
            .iter()
            .filter(|product_taxon| product_taxon.taxon == taxon.key)
            .copied()
            .collect()
    }

    /// Whether the product has at least one link to the given taxon.
    #[must_use]
    pub fn has_taxon(&self, taxon: &Taxon) -> bool {
        !self.filter_product_taxons_by_taxon(taxon).is_empty()
    }
}
