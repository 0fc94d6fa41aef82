//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Document store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Maximum optimistic transaction retries before surfacing a conflict.
    #[serde(default = "default_max_retries")]
    pub max_transaction_retries: u32,
}

fn default_max_retries() -> u32 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_transaction_retries: default_max_retries(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KITABU").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
