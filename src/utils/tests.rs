use serial_test::serial;
use tracing::level_filters::LevelFilter;

use super::error::Error;
use super::logging;
use crate::config::LoggingSettings;

fn level(name: &str) -> LoggingSettings {
    LoggingSettings {
        level: name.to_string(),
    }
}

#[test]
fn level_names_map_to_directives() {
    assert_eq!(logging::level_directive("debug"), "debug");
    assert_eq!(logging::level_directive("WARNING"), "warn");
    assert_eq!(logging::level_directive(" error "), "error");
    assert_eq!(logging::level_directive("nonsense"), "info");
}

#[test]
#[serial]
fn configured_level_applies_without_rust_log() {
    temp_env::with_var_unset("RUST_LOG", || {
        let filter = logging::filter_for(&level("warning"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    });
}

#[test]
#[serial]
fn rust_log_overrides_configured_level() {
    temp_env::with_var("RUST_LOG", Some("trace"), || {
        let filter = logging::filter_for(&level("error"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    });
}

#[test]
#[serial]
fn logging_init_is_repeatable() {
    logging::init(&level("info"));
    logging::init(&level("debug"));
}

#[test]
fn already_subscribed_names_the_key() {
    let err = Error::AlreadySubscribed("alice".to_string());
    assert_eq!(err.to_string(), "`alice` has already been subscribed");
    assert_eq!(err.as_label(), "already_subscribed");
}

#[test]
fn sled_errors_map_to_store_unavailable() {
    let err: Error = sled::Error::Unsupported("read only".to_string()).into();
    assert!(matches!(err, Error::StoreUnavailable(_)));
}
