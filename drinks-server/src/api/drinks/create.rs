use crate::api::drinks::DrinkList;
use crate::auth::Claims;
use crate::errors::{ApiError, ErrorResponse};
use crate::models::{DrinkPayload, NewDrink};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use crate::store::DrinkStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use log::info;

#[utoipa::path(
    post,
    path = "/drinks",
    tag = DRINKS_TAG,
    request_body = DrinkPayload,
    security(("bearer" = ["post:drinks"])),
    responses(
        (status = 200, description = "Drink created", body = DrinkList),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Missing or insufficient credentials", body = ErrorResponse),
        (status = 422, description = "Invalid drink or duplicate title", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn create_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Json<DrinkList>, ApiError> {
    let Json(payload) = payload?;
    let drink = state.store.create(NewDrink::try_from(payload)?).await?;

    info!("Drink {} created by '{}'", drink.id, claims.subject());
    Ok(Json(DrinkList::new(vec![drink])))
}
