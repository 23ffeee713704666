use super::{AuthError, Claims, KeySet};
use http::HeaderValue;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use log::debug;

/// Verifies bearer tokens against a trusted key set and the expected
/// issuer and audience
#[derive(Debug)]
pub struct TokenVerifier {
    keys: KeySet,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: KeySet, issuer: &str, audience: &str, algorithms: &[Algorithm]) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = algorithms.to_vec();
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self { keys, validation }
    }

    /// Verify the raw `Authorization` header value of a request
    pub fn verify(&self, header: Option<&HeaderValue>) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let token = bearer_token(header)?;
        self.verify_token(token)
    }

    /// Verify a compact-serialized JWT
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        if token.split('.').count() != 3 {
            return Err(AuthError::MalformedToken);
        }
        let header = decode_header(token).map_err(|e| {
            debug!("Failed to decode token header: {e}");
            AuthError::MalformedToken
        })?;

        let kid = header.kid.ok_or(AuthError::UnknownSigningKey)?;
        let key = self.keys.get(&kid).ok_or_else(|| {
            debug!("No trusted key with id '{kid}'");
            AuthError::UnknownSigningKey
        })?;

        let data = decode::<Claims>(token, key, &self.validation).map_err(|e| {
            debug!("Token rejected: {e}");
            AuthError::InvalidSignatureOrClaims
        })?;
        Ok(data.claims)
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn bearer_token(header: &HeaderValue) -> Result<&str, AuthError> {
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token)
        }
        _ => Err(AuthError::MalformedHeader),
    }
}
