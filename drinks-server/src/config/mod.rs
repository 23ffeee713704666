pub(crate) use crate::config::auth::{AuthConfig, KeySource};
pub(crate) use crate::config::cors::CorsConfig;
pub(crate) use crate::config::store::{StoreBackend, StoreConfig};
use confique::Config;
use std::path::PathBuf;
use thiserror::Error;

pub mod auth;
pub mod cors;
pub mod store;

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_FILE_ENV: &str = "DRINKS_CONFIG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] confique::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure for the drinks server
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The port the server will listen to (default: 5000)
    #[config(env = "DRINKS_PORT", default = 5000)]
    pub port: u16,

    /// Token verification configuration
    #[config(nested)]
    pub auth: AuthConfig,

    /// Drink store configuration
    #[config(nested)]
    pub store: StoreConfig,

    /// CORS configuration
    #[config(nested)]
    pub cors: CorsConfig,
}

impl Settings {
    /// Load settings from the environment, layered over the file named by
    /// `DRINKS_CONFIG_FILE` when it is set
    pub fn new() -> Result<Self, ConfigError> {
        let file = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
        Self::load_from(file)
    }

    /// Load settings from the environment and an optional TOML file.
    /// Environment variables take precedence over the file.
    pub fn load_from(file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Settings::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let settings = builder.load()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()?;
        self.store.backend()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            port: 0, // Let the OS choose a port
            auth: AuthConfig {
                issuer: crate::test_utils::TEST_ISSUER.to_string(),
                audience: crate::test_utils::TEST_AUDIENCE.to_string(),
                jwks_url: None,
                jwks_path: Some(PathBuf::from(concat!(
                    env!("CARGO_MANIFEST_DIR"),
                    "/testdata/jwks.json"
                ))),
                algorithms: "RS256".to_string(),
                jwks_timeout: 5,
            },
            store: StoreConfig {
                backend: "in-memory".to_string(),
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                reset_on_start: false,
            },
            cors: CorsConfig {
                allowed_origins: "*".to_string(),
            },
        }
    }
}
