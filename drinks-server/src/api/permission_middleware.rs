use crate::auth::{authorize, Claims, TokenVerifier};
use crate::errors::ApiError;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::{debug, warn};
use std::sync::Arc;

/// State for [`permission_middleware`]: the verifier plus the one permission
/// the wrapped route requires
#[derive(Clone)]
pub(crate) struct PermissionGate {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGate {
    pub(crate) fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }
}

/// Verifies the bearer token and checks the required permission before the
/// request reaches the handler. On success the verified [`Claims`] are put in
/// the request extensions.
pub(crate) async fn permission_middleware(
    State(gate): State<PermissionGate>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let verified = gate
        .verifier
        .verify(request.headers().get(http::header::AUTHORIZATION))
        .and_then(|claims| authorize(gate.permission, &claims).map(|()| claims));

    let claims: Claims = match verified {
        Ok(claims) => claims,
        Err(err) => {
            warn!(
                "Rejected {} {} requiring '{}': {}",
                request.method(),
                request.uri().path(),
                gate.permission,
                err.code()
            );
            return ApiError::from(err).into_response();
        }
    };

    debug!(
        "Caller '{}' granted '{}'",
        claims.subject(),
        gate.permission
    );
    request.extensions_mut().insert(claims);
    next.run(request).await
}
