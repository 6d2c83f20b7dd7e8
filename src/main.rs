//! Storefront CLI

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use storefront::{
    fixtures::{Fixture, FixtureError},
    forms::{ChannelPricingsForm, FormError, ProductVariantGenerationForm},
    logging::{self, LogFormat, LoggingError},
    promotions::{
        eligibility::{EligibilityError, RuleCheckerRegistry},
        rules::{TotalOfItemsFromTaxonRuleChecker, total_of_items_from_taxon},
    },
    report::{self, EligibilityRow, ReportError},
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront promotion and pricing CLI", long_about = None)]
struct Cli {
    /// Directory holding the fixture sets
    #[arg(long, global = true, default_value = "./fixtures")]
    fixtures: PathBuf,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check every promotion of a set against an order
    Eligibility(EligibilityArgs),

    /// Reconcile a variant's channel pricings against the set's channels
    Pricing(PricingArgs),
}

#[derive(Debug, Args)]
struct EligibilityArgs {
    /// Fixture set name
    #[arg(long)]
    set: String,

    /// Order key within the set
    #[arg(long)]
    order: String,
}

#[derive(Debug, Args)]
struct PricingArgs {
    /// Fixture set name
    #[arg(long)]
    set: String,

    /// Variant code within the set
    #[arg(long)]
    variant: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _written = writeln!(io::stderr(), "error: {error}");

            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    logging::init(cli.log_format)?;

    match cli.command {
        Commands::Eligibility(args) => eligibility(&cli.fixtures, &args),
        Commands::Pricing(args) => pricing(&cli.fixtures, &args),
    }
}

fn eligibility(fixtures: &Path, args: &EligibilityArgs) -> Result<(), CliError> {
    let fixture = Fixture::from_set_in(fixtures, &args.set)?;
    let order = fixture.order(&args.order)?;

    let mut registry = RuleCheckerRegistry::new();

    registry.register(
        total_of_items_from_taxon::TYPE,
        TotalOfItemsFromTaxonRuleChecker::new(fixture.taxons()),
    );

    let rows = fixture
        .promotions()
        .iter()
        .map(|promotion| -> Result<EligibilityRow, EligibilityError> {
            Ok(EligibilityRow {
                code: promotion.code.clone(),
                name: promotion.name.clone(),
                eligible: registry.is_promotion_eligible(&order, promotion)?,
            })
        })
        .collect::<Result<Vec<_>, EligibilityError>>()?;

    info!(
        set = args.set.as_str(),
        order = order.number(),
        promotions = rows.len(),
        eligible = rows.iter().filter(|row| row.eligible).count(),
        "checked promotion eligibility"
    );

    report::write_eligibility_table(&mut io::stdout().lock(), order.number(), &rows)?;

    Ok(())
}

fn pricing(fixtures: &Path, args: &PricingArgs) -> Result<(), CliError> {
    let fixture = Fixture::from_set_in(fixtures, &args.set)?;
    let key = fixture.variant_key(&args.variant)?;
    let variant = fixture.variant(&args.variant)?;

    let form = ProductVariantGenerationForm::new(ChannelPricingsForm::new(fixture.channels()));
    let state = form.load(key, variant)?;

    info!(
        set = args.set.as_str(),
        variant = variant.code.as_str(),
        entries = state.data.len(),
        "loaded channel pricings"
    );

    report::write_pricing_table(&mut io::stdout().lock(), &variant.code, &state.data)?;

    Ok(())
}
