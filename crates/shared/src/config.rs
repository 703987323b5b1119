//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Object store configuration.
    pub storage: StorageSettings,
}

/// Raw object store settings as loaded from the environment.
///
/// These are unvalidated strings; `flowdeck-core` converts them into a
/// validated store configuration at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage account name.
    pub account: String,
    /// Base64-encoded storage account access key.
    pub access_key: String,
    /// Container holding all media blobs.
    pub container: String,
    /// Host suffix of the blob endpoint.
    #[serde(default = "default_endpoint_suffix")]
    pub endpoint_suffix: String,
}

fn default_endpoint_suffix() -> String {
    "blob.core.windows.net".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        // A missing .env file is fine outside development.
        let _ = dotenvy::dotenv();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FLOWDECK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
