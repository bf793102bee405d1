/*
 * Responsibility
 * - v1 URL layout
 * - /drinks, /drinks-detail, /drinks/{drink_id}
 * - Permission guards are attached per method with requires_auth, then merged
 */
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::api::v1::extractors::require_drink_id;
use crate::api::v1::handlers::drinks::{
    create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink,
};
use crate::middleware::auth::requires_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let authorizer = &state.authorizer;

    Router::new()
        .route(
            "/drinks",
            get(list_drinks).merge(requires_auth(
                "post:drinks",
                authorizer.clone(),
                post(create_drink),
            )),
        )
        .route(
            "/drinks-detail",
            requires_auth(
                "get:drinks-detail",
                authorizer.clone(),
                get(list_drinks_detail),
            ),
        )
        .route(
            "/drinks/{drink_id}",
            requires_auth("patch:drinks", authorizer.clone(), patch(update_drink))
                .merge(requires_auth(
                    "delete:drinks",
                    authorizer.clone(),
                    delete(delete_drink),
                ))
                // outermost: id shape is checked before the guard
                .route_layer(middleware::from_fn(require_drink_id)),
        )
}
