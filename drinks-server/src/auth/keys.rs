use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("failed to read key set file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse key set: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to fetch key set: {0}")]
    Http(#[from] reqwest::Error),
    #[error("key set contains no usable signing keys")]
    Empty,
}

/// Trusted signing keys indexed by key id.
///
/// Loaded once at startup and only read afterwards.
pub struct KeySet {
    keys: HashMap<String, DecodingKey>,
}

impl std::fmt::Debug for KeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySet")
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeySet {
    /// Build a key set from a parsed JWKS document, skipping keys that have
    /// no `kid` or cannot be used for signature verification
    pub fn from_jwks(jwks: &JwkSet) -> Result<Self, KeySetError> {
        let mut keys = HashMap::new();
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                warn!("Skipping JWK without a key id");
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(e) => warn!("Skipping JWK '{kid}': {e}"),
            }
        }

        if keys.is_empty() {
            return Err(KeySetError::Empty);
        }
        debug!("Loaded {} signing key(s)", keys.len());
        Ok(Self { keys })
    }

    pub fn from_json(json: &str) -> Result<Self, KeySetError> {
        let jwks: JwkSet = serde_json::from_str(json)?;
        Self::from_jwks(&jwks)
    }

    /// Load a JWKS document from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeySetError> {
        let path = path.as_ref();
        info!("Loading signing keys from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Fetch a JWKS document from the identity provider
    pub async fn fetch(url: &Url, timeout: Duration) -> Result<Self, KeySetError> {
        info!("Fetching signing keys from {url}");
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let jwks: JwkSet = client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Self::from_jwks(&jwks)
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }
}
