//! Tracing subscriber setup.
//!
//! Events go to stderr so command output on stdout stays clean. `RUST_LOG`
//! overrides the configured level when it holds a valid filter.

use std::io;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Errors raised while configuring tracing.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// Offending directive.
        directive: String,
        /// Parser failure.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Builds the event filter for `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `RUST_LOG` is unset or
/// invalid and the configured level does not parse.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|source| TelemetryError::InvalidFilter {
        directive: config.level.clone(),
        source,
    })
}

/// Installs the global subscriber.
///
/// Returns `false` when a subscriber was already installed, in which case
/// the existing one is kept.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter cannot be built.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, TelemetryError> {
    let filter = build_filter(config)?;
    let (json, text) = match config.format {
        LogFormat::Json => (
            Some(fmt::layer().json().with_target(true).with_writer(io::stderr)),
            None,
        ),
        LogFormat::Text => (None, Some(fmt::layer().with_writer(io::stderr))),
    };
    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()
        .is_ok())
}
