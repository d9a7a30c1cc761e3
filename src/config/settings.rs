use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub registry: RegistrySettings,
    pub broadcast: BroadcastSettings,
    pub logging: LoggingSettings,
}

/// Address the WebSocket adapter binds to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Location of the sled database and the name of the message log inside it.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub path: String,
    pub log_key: String,
}

/// Per-subscriber delivery queue sizing.
#[derive(Debug, Deserialize, Clone)]
pub struct RegistrySettings {
    pub queue_capacity: usize,
}

/// Buffer size of the in-process broadcast channel.
#[derive(Debug, Deserialize, Clone)]
pub struct BroadcastSettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub store: Option<PartialStoreSettings>,
    pub registry: Option<PartialRegistrySettings>,
    pub broadcast: Option<PartialBroadcastSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStoreSettings {
    pub path: Option<String>,
    pub log_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRegistrySettings {
    pub queue_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBroadcastSettings {
    pub capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            store: StoreSettings {
                path: "feedhub_db".to_string(),
                log_key: "messages".to_string(),
            },
            registry: RegistrySettings {
                queue_capacity: crate::broker::registry::DEFAULT_QUEUE_CAPACITY,
            },
            broadcast: BroadcastSettings { capacity: 64 },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PartialSettings {
    /// Fill every missing value from `defaults`.
    pub fn merge(self, defaults: Settings) -> Settings {
        let server = self.server;
        let store = self.store;
        let registry = self.registry;
        let broadcast = self.broadcast;
        let logging = self.logging;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(defaults.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(defaults.server.port),
            },
            store: StoreSettings {
                path: store
                    .as_ref()
                    .and_then(|s| s.path.clone())
                    .unwrap_or(defaults.store.path),
                log_key: store
                    .as_ref()
                    .and_then(|s| s.log_key.clone())
                    .unwrap_or(defaults.store.log_key),
            },
            registry: RegistrySettings {
                queue_capacity: registry
                    .as_ref()
                    .and_then(|r| r.queue_capacity)
                    .unwrap_or(defaults.registry.queue_capacity)
                    .max(1),
            },
            broadcast: BroadcastSettings {
                capacity: broadcast
                    .as_ref()
                    .and_then(|b| b.capacity)
                    .unwrap_or(defaults.broadcast.capacity)
                    .max(1),
            },
            logging: LoggingSettings {
                level: logging
                    .as_ref()
                    .and_then(|l| l.level.clone())
                    .unwrap_or(defaults.logging.level),
            },
        }
    }
}
