//! Tracing subscriber setup.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{LogFormat, LoggingConfig, TollgateError};

/// Installs the global tracing subscriber.
///
/// The base filter comes from `RUST_LOG`, falling back to `info`; the
/// configured directives are layered on top.
///
/// # Errors
/// Returns [`TollgateError::Logging`] if a global subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TollgateError> {
    let fmt_layer = match config.format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    let filter_layer = config
        .filters
        .iter()
        .cloned()
        .fold(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            |layer, directive| layer.add_directive(directive),
        );

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(format = ?config.format, "logging initialized");
    Ok(())
}
