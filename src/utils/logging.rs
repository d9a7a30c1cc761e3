//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence when it holds a valid filter, so a single
//! run can turn up one module (`RUST_LOG=feedhub::broker=trace`). Otherwise
//! the configured `logging.level` applies to everything.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Filter directive for a configured level name. Unrecognised names fall
/// back to `info`.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => "off",
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    }
}

/// The filter [`init`] installs for `settings`.
pub fn filter_for(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(&settings.level)))
}

/// Install the global fmt subscriber. Later calls are no-ops, since tests and
/// the binary may both get here.
pub fn init(settings: &LoggingSettings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(settings))
        .with_target(false)
        .try_init();
}
