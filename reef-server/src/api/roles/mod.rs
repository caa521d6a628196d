//! Role management routes

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permissions;
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    let read = Router::new()
        .nest("/api/roles", read_routes())
        .layer(middleware::from_fn(require_permissions(&["VIEW_ROLES"])));

    let create = Router::new()
        .route("/api/roles", post(handler::create))
        .layer(middleware::from_fn(require_permissions(&["CREATE_ROLE"])));

    let edit = Router::new()
        .route("/api/roles/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permissions(&["EDIT_ROLE"])));

    let remove = Router::new()
        .route("/api/roles/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&["DELETE_ROLE"])));

    read.merge(create).merge(edit).merge(remove)
}

fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/permissions", get(handler::permission_catalog))
        .route("/{id}", get(handler::get_by_id))
}
