//! The `config` module loads runtime settings.
//!
//! Values come from an optional `config/default` file and from `FEEDHUB_`
//! environment variables, layered over the defaults in [`Settings::default`].
//! Sections and keys are joined by a double underscore, so keys that contain
//! one keep it: `FEEDHUB_SERVER__PORT`, `FEEDHUB_REGISTRY__QUEUE_CAPACITY`,
//! `FEEDHUB_STORE__LOG_KEY`.

mod settings;

use crate::config::settings::PartialSettings;
use crate::utils::Result;
use config::{Config, Environment, File};

pub use settings::{
    BroadcastSettings, LoggingSettings, RegistrySettings, ServerSettings, Settings, StoreSettings,
};

/// Loads the configuration from the default file and environment variables
/// and merges it with default values.
pub fn load_config() -> Result<Settings> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("FEEDHUB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge(Settings::default()))
}

#[cfg(test)]
mod tests;
