use crate::config::{StoreBackend, StoreConfig};
use crate::models::{Drink, DrinkPatch, Ingredient, NewDrink, Recipe, RecipeInput};
use log::info;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("drink {0} not found")]
    NotFound(i64),
    #[error("a drink titled '{0}' already exists")]
    DuplicateTitle(String),
    #[error("drink {id} holds an undecodable recipe: {reason}")]
    CorruptRecipe { id: i64, reason: String },
    #[error("failed to encode recipe: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Persistence contract for drinks.
///
/// Every backend must be safe to share between handlers; each operation runs
/// as a single atomic unit against the backing storage. Create and update
/// only accept validated [`Recipe`] values, so a backend never holds a row
/// whose recipe fails to decode.
#[async_trait::async_trait]
pub trait DrinkStore: Send + Sync {
    /// All drinks ordered by id
    async fn list(&self) -> Result<Vec<Drink>, StoreError>;

    /// A single drink, or [`StoreError::NotFound`]
    async fn get(&self, id: i64) -> Result<Drink, StoreError>;

    /// Insert a drink and return it with its assigned id
    async fn create(&self, drink: NewDrink) -> Result<Drink, StoreError>;

    /// Replace the fields present in `patch` and return the updated drink
    async fn update(&self, id: i64, patch: DrinkPatch) -> Result<Drink, StoreError>;

    /// Remove a drink, or [`StoreError::NotFound`]
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Drop every drink and restart id assignment
    async fn reset(&self) -> Result<(), StoreError>;

    /// Returns Ok(()) if the backend answers, or a descriptive message otherwise
    async fn health_check(&self) -> Result<(), String>;
}

/// Store implementation chosen at startup from configuration
#[derive(Clone)]
pub enum Store {
    /// SQLite-backed store using sqlx
    Sqlite(sqlite::SqliteStore),
    /// Process-local store, contents are lost on restart
    InMemory(memory::InMemoryStore),
}

#[async_trait::async_trait]
impl DrinkStore for Store {
    async fn list(&self) -> Result<Vec<Drink>, StoreError> {
        match self {
            Self::Sqlite(store) => store.list().await,
            Self::InMemory(store) => store.list().await,
        }
    }

    async fn get(&self, id: i64) -> Result<Drink, StoreError> {
        match self {
            Self::Sqlite(store) => store.get(id).await,
            Self::InMemory(store) => store.get(id).await,
        }
    }

    async fn create(&self, drink: NewDrink) -> Result<Drink, StoreError> {
        match self {
            Self::Sqlite(store) => store.create(drink).await,
            Self::InMemory(store) => store.create(drink).await,
        }
    }

    async fn update(&self, id: i64, patch: DrinkPatch) -> Result<Drink, StoreError> {
        match self {
            Self::Sqlite(store) => store.update(id, patch).await,
            Self::InMemory(store) => store.update(id, patch).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.delete(id).await,
            Self::InMemory(store) => store.delete(id).await,
        }
    }

    async fn reset(&self) -> Result<(), StoreError> {
        match self {
            Self::Sqlite(store) => store.reset().await,
            Self::InMemory(store) => store.reset().await,
        }
    }

    async fn health_check(&self) -> Result<(), String> {
        match self {
            Self::Sqlite(store) => store.health_check().await,
            Self::InMemory(store) => store.health_check().await,
        }
    }
}

/// The drink inserted after a reset
pub fn seed_drink() -> NewDrink {
    NewDrink {
        title: "water".to_string(),
        recipe: Recipe::try_from(RecipeInput::One(Ingredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: 1,
        }))
        .expect("seed recipe is valid"),
    }
}

/// Build the configured store, resetting and seeding it when requested
pub async fn create_store(config: &StoreConfig) -> Result<Store, StoreError> {
    let backend = config.backend().map_err(|e| StoreError::Config(e.to_string()))?;
    let store = match backend {
        StoreBackend::Sqlite => {
            let store = sqlite::SqliteStore::connect(&config.url, config.max_connections).await?;
            Store::Sqlite(store)
        }
        StoreBackend::InMemory => Store::InMemory(memory::InMemoryStore::new()),
    };

    if config.reset_on_start {
        info!("Resetting drink store and seeding default drink");
        store.reset().await?;
        store.create(seed_drink()).await?;
    }

    Ok(store)
}
