use crate::api::drinks::DeleteResponse;
use crate::auth::Claims;
use crate::errors::{ApiError, ErrorResponse};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use crate::store::DrinkStore;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use log::info;

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = DRINKS_TAG,
    params(("id" = i64, Path, description = "Drink id")),
    security(("bearer" = ["delete:drinks"])),
    responses(
        (status = 200, description = "Drink deleted", body = DeleteResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or insufficient credentials", body = ErrorResponse),
        (status = 404, description = "No drink with this id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = id?;
    state.store.delete(id).await?;

    info!("Drink {id} deleted by '{}'", claims.subject());
    Ok(Json(DeleteResponse::new(id)))
}
