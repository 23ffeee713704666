pub(crate) mod drinks;
pub(crate) mod health;
mod permission_middleware;

use crate::config::CorsConfig;
use crate::errors::ApiError;
use crate::state::AppState;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use log::warn;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(drinks::router(state))
}

/// Unmatched paths
pub(super) async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Matched path, unsupported method
pub(super) async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Build the CORS layer from configuration. Origins that are not valid
/// header values are skipped.
pub(super) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .get_allowed_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
