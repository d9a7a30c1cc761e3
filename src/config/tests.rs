use super::load_config;
use super::settings::Settings;
use serial_test::serial;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.store.log_key, "messages");
    assert_eq!(settings.registry.queue_capacity, 2);
    assert_eq!(settings.broadcast.capacity, 64);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn env_overrides_defaults() {
    temp_env::with_vars(
        [
            ("FEEDHUB_SERVER__PORT", Some("9100")),
            ("FEEDHUB_STORE__PATH", Some("/tmp/feedhub-env")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.port, 9100);
            assert_eq!(cfg.store.path, "/tmp/feedhub-env");
            assert_eq!(cfg.server.host, "127.0.0.1");
            assert_eq!(cfg.registry.queue_capacity, 2);
        },
    );
}

#[test]
#[serial]
fn env_overrides_keys_containing_underscores() {
    temp_env::with_vars(
        [
            ("FEEDHUB_REGISTRY__QUEUE_CAPACITY", Some("7")),
            ("FEEDHUB_STORE__LOG_KEY", Some("chat")),
            ("FEEDHUB_LOGGING__LEVEL", Some("debug")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.registry.queue_capacity, 7);
            assert_eq!(cfg.store.log_key, "chat");
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.server.port, 8080);
        },
    );
}

#[test]
#[serial]
fn unprefixed_env_is_ignored() {
    temp_env::with_vars(
        [
            ("SERVER_PORT", Some("9200")),
            ("REGISTRY_QUEUE_CAPACITY", Some("9")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.server.port, 8080);
            assert_eq!(cfg.registry.queue_capacity, 2);
        },
    );
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    let tmp = tempfile::TempDir::new().expect("create tempdir");
    let orig = std::env::current_dir().expect("current_dir");
    std::env::set_current_dir(tmp.path()).expect("set current dir");

    std::fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [server]
        host = "0.0.0.0"

        [store]
        log_key = "chat"

        [registry]
        queue_capacity = 0
    "#;
    std::fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();
    std::env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.store.log_key, "chat");
    // zero capacity is clamped so a subscriber can always hold one message
    assert_eq!(cfg.registry.queue_capacity, 1);
}
