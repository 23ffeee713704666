use crate::auth::{KeySet, KeySetError, TokenVerifier};
use crate::config::{ConfigError, KeySource, Settings};
use crate::store::{create_store, DrinkStore, Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load signing keys: {0}")]
    KeySet(#[from] KeySetError),
    #[error("failed to initialize store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub verifier: Arc<TokenVerifier>,
    pub store: Arc<Store>,
}

impl AppState {
    /// Load the trusted key set and open the configured store
    pub async fn new(settings: Settings) -> Result<Self, StateError> {
        let keys = match settings.auth.key_source()? {
            KeySource::File(path) => KeySet::from_file(path)?,
            KeySource::Url(url) => {
                KeySet::fetch(&url, Duration::from_secs(settings.auth.jwks_timeout)).await?
            }
        };
        let verifier = Self::create_verifier(&settings, keys)?;
        let store = create_store(&settings.store).await?;

        Ok(Self::with_parts(settings, verifier, store))
    }

    fn create_verifier(settings: &Settings, keys: KeySet) -> Result<TokenVerifier, ConfigError> {
        Ok(TokenVerifier::new(
            keys,
            &settings.auth.issuer,
            &settings.auth.audience,
            &settings.auth.get_algorithms()?,
        ))
    }

    pub fn with_parts(settings: Settings, verifier: TokenVerifier, store: Store) -> Self {
        Self {
            settings: Arc::new(settings),
            verifier: Arc::new(verifier),
            store: Arc::new(store),
        }
    }

    /// Check if all components are healthy
    pub async fn health_check(&self) -> Result<(), String> {
        self.store.health_check().await
    }

    #[cfg(test)]
    pub(crate) fn for_testing(settings: &Settings) -> Self {
        let keys = KeySet::from_json(crate::test_utils::TEST_JWKS).expect("test key set is valid");
        let verifier =
            Self::create_verifier(settings, keys).expect("test settings are valid");
        let store = Store::InMemory(crate::store::memory::InMemoryStore::new());
        Self::with_parts(settings.clone(), verifier, store)
    }
}
