//! Promotion Rules

pub mod total_of_items_from_taxon;

pub use total_of_items_from_taxon::TotalOfItemsFromTaxonRuleChecker;
