use crate::api::drinks::{DrinkList, ShortDrinkList};
use crate::errors::{ApiError, ErrorResponse};
use crate::openapi::DRINKS_TAG;
use crate::state::AppState;
use crate::store::DrinkStore;
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/drinks",
    tag = DRINKS_TAG,
    responses(
        (status = 200, description = "All drinks without ingredient names", body = ShortDrinkList),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<ShortDrinkList>, ApiError> {
    let drinks = state.store.list().await?;
    Ok(Json(ShortDrinkList::new(
        drinks.iter().map(|drink| drink.short()).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = DRINKS_TAG,
    security(("bearer" = ["get:drinks-detail"])),
    responses(
        (status = 200, description = "All drinks with full recipes", body = DrinkList),
        (status = 401, description = "Missing or insufficient credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_drinks_detail(
    State(state): State<AppState>,
) -> Result<Json<DrinkList>, ApiError> {
    let drinks = state.store.list().await?;
    Ok(Json(DrinkList::new(drinks)))
}
