//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
}

/// Installs a formatted `tracing` subscriber filtered by `directive`.
///
/// Returns `Ok(false)` when a global subscriber was already installed, which
/// is left in place.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when `directive` is not a valid
/// filter.
pub fn init_tracing(directive: &str) -> Result<bool, TelemetryError> {
    let filter = EnvFilter::try_new(directive).map_err(|err| TelemetryError::InvalidFilter {
        directive: directive.to_owned(),
        reason: err.to_string(),
    })?;
    Ok(tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok())
}
