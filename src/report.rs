//! Report
//!
//! Terminal tables for the command line.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::pricing::{ChannelPricing, ChannelPricings};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the output failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Eligibility of one promotion for a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRow {
    /// Promotion code
    pub code: String,

    /// Promotion name
    pub name: String,

    /// Whether every rule of the promotion is satisfied
    pub eligible: bool,
}

/// Write a promotion eligibility table.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if writing fails.
pub fn write_eligibility_table(
    out: &mut impl io::Write,
    order_number: &str,
    rows: &[EligibilityRow],
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Promotion", "Name", "Eligible"]);

    for row in rows {
        builder.push_record([
            row.code.clone(),
            row.name.clone(),
            if row.eligible { "yes" } else { "no" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    writeln!(out, "Order #{order_number}")?;
    writeln!(out, "{table}")?;

    Ok(())
}

/// Write the channel pricings of a variant.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if writing fails.
pub fn write_pricing_table(
    out: &mut impl io::Write,
    variant_code: &str,
    pricings: &ChannelPricings<'_>,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Channel", "Price", "Original price", "Reduced"]);

    for (channel_code, pricing) in pricings.iter() {
        builder.push_record([
            channel_code.to_string(),
            pricing.price().map(ToString::to_string).unwrap_or_default(),
            pricing
                .original_price()
                .map(ToString::to_string)
                .unwrap_or_default(),
            reduced_cell(pricing).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..3), Alignment::right());

    writeln!(out, "Variant {variant_code}")?;
    writeln!(out, "{table}")?;

    Ok(())
}

fn reduced_cell(pricing: &ChannelPricing<'_>) -> &'static str {
    if pricing.is_price_reduced() { "yes" } else { "" }
}
