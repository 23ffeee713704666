pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod list;
pub(crate) mod update;

use crate::api::permission_middleware::{permission_middleware, PermissionGate};
use crate::auth::permissions::{DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS};
use crate::models::{Drink, ShortDrink};
use crate::state::AppState;
use axum::middleware;
use axum::routing::{delete, get, patch, post, MethodRouter};
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public listing response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShortDrinkList {
    success: bool,
    drinks: Vec<ShortDrink>,
}

impl ShortDrinkList {
    pub(crate) fn new(drinks: Vec<ShortDrink>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

/// Detailed listing response, also returned by create and update
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DrinkList {
    success: bool,
    drinks: Vec<Drink>,
}

impl DrinkList {
    pub(crate) fn new(drinks: Vec<Drink>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

/// Response for a successful delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeleteResponse {
    success: bool,
    /// Id of the deleted drink
    delete: i64,
}

impl DeleteResponse {
    pub(crate) fn new(id: i64) -> Self {
        Self {
            success: true,
            delete: id,
        }
    }
}

/// Wrap a method router so it only runs for callers holding `permission`
fn require(
    state: &AppState,
    permission: &'static str,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        PermissionGate::new(state.verifier.clone(), permission),
        permission_middleware,
    ))
}

/// Combines all drink routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/drinks",
            get(list::list_drinks).merge(require(
                state,
                POST_DRINKS,
                post(create::create_drink),
            )),
        )
        .route(
            "/drinks-detail",
            require(state, GET_DRINKS_DETAIL, get(list::list_drinks_detail)),
        )
        .route(
            "/drinks/{id}",
            require(state, PATCH_DRINKS, patch(update::update_drink)).merge(require(
                state,
                DELETE_DRINKS,
                delete(delete::delete_drink),
            )),
        )
}
