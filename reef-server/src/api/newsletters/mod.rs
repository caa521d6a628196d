//! Newsletter routes
//!
//! Subscription management is public (rate limited); everything else is
//! staff-only behind per-operation permissions.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_permissions;
use crate::core::AppState;
use crate::services::rate_limit;

pub fn router(state: &AppState) -> Router<AppState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permissions(&[
            "VIEW_NEWSLETTERS",
        ])));

    let edit = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&[
            "EDIT_NEWSLETTER",
        ])));

    let send = Router::new()
        .route("/{id}/send", post(handler::send))
        .layer(middleware::from_fn(require_permissions(&[
            "SEND_NEWSLETTER",
        ])));

    let subscribers = Router::new()
        .route("/subscribers", get(handler::list_subscribers))
        .layer(middleware::from_fn(require_permissions(&[
            "VIEW_SUBSCRIBERS",
        ])));

    let public = Router::new()
        .route("/subscribe", post(handler::subscribe))
        .route("/unsubscribe", post(handler::unsubscribe))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit("newsletter"),
        ));

    Router::new().nest(
        "/api/newsletters",
        read.merge(edit).merge(send).merge(subscribers).merge(public),
    )
}
