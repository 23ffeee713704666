//! Bearer token verification and permission checks
//!
//! Tokens are JWTs issued by an external identity provider. The provider's
//! public keys are loaded once at startup into a [`KeySet`]; the
//! [`TokenVerifier`] checks signature, issuer, audience and expiry, and
//! [`authorize`] checks the `permissions` claim against the permission a
//! route requires.

mod guard;
mod keys;
mod verifier;

pub use guard::authorize;
pub use keys::{KeySet, KeySetError};
pub use verifier::TokenVerifier;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permission strings required by the drink routes
pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

/// Reasons a request fails authentication or authorization.
///
/// The display strings are sent to clients, so none of them include any part
/// of the presented token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,
    #[error("Authorization header must be in the form 'Bearer <token>'.")]
    MalformedHeader,
    #[error("Unable to parse authentication token.")]
    MalformedToken,
    #[error("Unable to find the appropriate signing key.")]
    UnknownSigningKey,
    #[error("Token is invalid, expired, or not meant for this service.")]
    InvalidSignatureOrClaims,
    #[error("Permissions not included in the token.")]
    PermissionsClaimAbsent,
    #[error("Permission not found.")]
    MissingPermission,
}

impl AuthError {
    /// Short machine-readable code, used in logs
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader => "invalid_header",
            AuthError::MalformedToken => "invalid_token",
            AuthError::UnknownSigningKey => "unknown_signing_key",
            AuthError::InvalidSignatureOrClaims => "invalid_claims",
            AuthError::PermissionsClaimAbsent => "permissions_absent",
            AuthError::MissingPermission => "unauthorized",
        }
    }
}

/// Verified token payload, owned by the request that presented the token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (the caller), when the provider sets one
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry, seconds since the epoch
    pub exp: u64,
    /// Issued-at, seconds since the epoch
    #[serde(default)]
    pub iat: Option<u64>,
    /// Space-separated OAuth scopes, when present
    #[serde(default)]
    pub scope: Option<String>,
    /// Granted permissions. `None` when the token carries no permissions
    /// claim at all, which is distinct from an empty list.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Caller identity for log lines
    pub fn subject(&self) -> &str {
        self.sub.as_deref().unwrap_or("<unknown>")
    }
}
