use crate::api::drinks::DrinkList;
use crate::auth::Claims;
use crate::errors::{ApiError, ErrorResponse};
use crate::models::{DrinkPatch, DrinkPayload};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use crate::store::DrinkStore;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use log::info;

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    params(("id" = i64, Path, description = "Drink id")),
    request_body = DrinkPayload,
    security(("bearer" = ["patch:drinks"])),
    responses(
        (status = 200, description = "Drink updated", body = DrinkList),
        (status = 400, description = "Malformed id or request body", body = ErrorResponse),
        (status = 401, description = "Missing or insufficient credentials", body = ErrorResponse),
        (status = 404, description = "No drink with this id", body = ErrorResponse),
        (status = 422, description = "Invalid update or duplicate title", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn update_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Json<DrinkList>, ApiError> {
    let Path(id) = id?;
    // 404 takes precedence over a bad body
    state.store.get(id).await?;

    let Json(payload) = payload?;
    let drink = state.store.update(id, DrinkPatch::try_from(payload)?).await?;

    info!("Drink {} updated by '{}'", drink.id, claims.subject());
    Ok(Json(DrinkList::new(vec![drink])))
}
