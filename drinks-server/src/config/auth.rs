//! Bearer token verification configuration

use super::ConfigError;
use confique::Config;
use jsonwebtoken::Algorithm;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Where the trusted signing keys are loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    File(PathBuf),
    Url(Url),
}

/// Identity provider configuration
#[derive(Debug, Config, Clone)]
pub struct AuthConfig {
    /// Expected `iss` claim, e.g. "https://tenant.auth0.com/"
    #[config(env = "DRINKS_AUTH_ISSUER", default = "")]
    pub issuer: String,

    /// Expected `aud` claim (default: "drinks")
    #[config(env = "DRINKS_AUTH_AUDIENCE", default = "drinks")]
    pub audience: String,

    /// URL of the JWKS document, fetched once at startup.
    /// Defaults to `<issuer>/.well-known/jwks.json`
    #[config(env = "DRINKS_AUTH_JWKS_URL")]
    pub jwks_url: Option<String>,

    /// Local JWKS file, takes precedence over `jwks_url`
    #[config(env = "DRINKS_AUTH_JWKS_PATH")]
    pub jwks_path: Option<PathBuf>,

    /// Accepted signing algorithms, comma-separated (default: "RS256")
    #[config(env = "DRINKS_AUTH_ALGORITHMS", default = "RS256")]
    pub algorithms: String,

    /// Timeout for fetching the JWKS document in seconds (default: 5)
    #[config(env = "DRINKS_AUTH_JWKS_TIMEOUT", default = 5)]
    pub jwks_timeout: u64,
}

impl AuthConfig {
    /// Get the accepted algorithms as a vector
    pub fn get_algorithms(&self) -> Result<Vec<Algorithm>, ConfigError> {
        let algorithms = self
            .algorithms
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Algorithm::from_str(s)
                    .map_err(|_| ConfigError::Invalid(format!("unknown signing algorithm '{s}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if algorithms.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one signing algorithm is required".to_string(),
            ));
        }
        Ok(algorithms)
    }

    /// Resolve where the key set should be loaded from
    pub fn key_source(&self) -> Result<KeySource, ConfigError> {
        if let Some(path) = &self.jwks_path {
            return Ok(KeySource::File(path.clone()));
        }

        let url = match &self.jwks_url {
            Some(url) => Url::parse(url),
            None => {
                let issuer = if self.issuer.ends_with('/') {
                    self.issuer.clone()
                } else {
                    format!("{}/", self.issuer)
                };
                Url::parse(&issuer).and_then(|base| base.join(".well-known/jwks.json"))
            }
        }
        .map_err(|e| ConfigError::Invalid(format!("invalid JWKS URL: {e}")))?;

        Ok(KeySource::Url(url))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "DRINKS_AUTH_ISSUER must be set".to_string(),
            ));
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "DRINKS_AUTH_AUDIENCE must not be empty".to_string(),
            ));
        }
        self.get_algorithms()?;
        self.key_source()?;
        Ok(())
    }
}
