use super::ConfigError;
use confique::Config;

/// Specifies which store implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    InMemory,
}

/// Configuration for the drink store
#[derive(Debug, Config, Clone)]
pub struct StoreConfig {
    /// Store backend: "sqlite" (default) or "in-memory"
    #[config(env = "DRINKS_STORE_BACKEND", default = "sqlite")]
    pub backend: String,

    /// SQLite connection URL (default: sqlite://drinks.db)
    #[config(env = "DRINKS_STORE_URL", default = "sqlite://drinks.db")]
    pub url: String,

    /// Maximum number of pooled SQLite connections (default: 5)
    #[config(env = "DRINKS_STORE_MAX_CONNECTIONS", default = 5)]
    pub max_connections: u32,

    /// Drop all drinks at startup and seed the default one (default: false)
    #[config(env = "DRINKS_STORE_RESET_ON_START", default = false)]
    pub reset_on_start: bool,
}

impl StoreConfig {
    pub fn backend(&self) -> Result<StoreBackend, ConfigError> {
        match self.backend.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::Sqlite),
            "in-memory" | "memory" => Ok(StoreBackend::InMemory),
            other => Err(ConfigError::Invalid(format!(
                "unknown store backend '{other}', expected 'sqlite' or 'in-memory'"
            ))),
        }
    }
}
