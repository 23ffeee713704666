use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const DRINKS_TAG: &str = "Drinks API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::drinks::list::list_drinks,
        crate::api::drinks::list::list_drinks_detail,
        crate::api::drinks::create::create_drink,
        crate::api::drinks::update::update_drink,
        crate::api::drinks::delete::delete_drink,
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = DRINKS_TAG, description = "Drink menu endpoints"),
    ),
    info(
        title = "Drinks API",
        description = "Drink menu service with permission-scoped bearer tokens",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;

/// Declares the `bearer` scheme referenced by the protected routes
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Creates a router for OpenAPI documentation routes
pub(crate) fn router() -> Router<AppState> {
    let api_doc = ApiDoc::openapi();
    let document = api_doc.clone();

    Router::new()
        .route("/openapi.json", get(move || async move { Json(document) }))
        .merge(Scalar::with_url("/scalar", api_doc))
}
