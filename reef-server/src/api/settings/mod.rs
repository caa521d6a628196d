//! Site settings routes

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_permissions;
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{key}", get(handler::get_by_key))
        .layer(middleware::from_fn(require_permissions(&["VIEW_SETTINGS"])));

    let edit = Router::new()
        .route("/{key}", put(handler::upsert).delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&["EDIT_SETTINGS"])));

    Router::new().nest("/api/settings", read.merge(edit))
}
