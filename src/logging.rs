//! Tracing bootstrap for host applications.
//!
//! The subscriber is installed once by the host; the returned reload handle
//! lets the configured level take effect after the config file is read.

use crate::config::LogLevel;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

pub type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Install the global subscriber. `RUST_LOG` wins until
/// [`apply_log_level`] is called with the loaded configuration.
pub fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config log_level or RUST_LOG");
    handle
}

/// Swap the active filter for the configured level.
pub fn apply_log_level(handle: &ReloadHandle, level: LogLevel) {
    let parsed = EnvFilter::builder()
        .parse(level.as_filter_str())
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
