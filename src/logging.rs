//! Logging subscriber initialisation.

use std::io;

use clap::ValueEnum;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Default filter directive when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable single line output
    #[default]
    Compact,

    /// One JSON object per line
    Json,
}

/// Install the global subscriber. Logs are written to stderr.
///
/// # Errors
///
/// Returns [`LoggingError::Init`] if a global subscriber is already installed.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    match format {
        LogFormat::Compact => init_with_layer(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn init_with_layer<L>(fmt_layer: L) -> Result<(), LoggingError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter())
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        let first = init(LogFormat::Json);
        let second = init(LogFormat::Compact);

        assert!(first.is_ok(), "first init should install the subscriber");
        assert!(matches!(second, Err(LoggingError::Init(_))));
    }

    #[test]
    fn compact_is_the_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
