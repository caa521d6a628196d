//! User administration routes

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{require_any_permission, require_permissions};
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    let read = Router::new()
        .nest("/api/users", read_routes())
        .layer(middleware::from_fn(require_permissions(&["VIEW_USERS"])));

    let edit = Router::new()
        .route("/api/users", post(handler::create))
        .route("/api/users/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permissions(&["EDIT_USER"])));

    let remove = Router::new()
        .route("/api/users/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&["DELETE_USER"])));

    // Role binding is its own concern: either binding or role-editing
    // authority unlocks it, subject to the level ceiling in the handler
    let bind = Router::new()
        .route("/api/users/{id}/roles", put(handler::set_roles))
        .layer(middleware::from_fn(require_any_permission(&[
            "BIND_ROLE",
            "EDIT_ROLE",
        ])));

    read.merge(edit).merge(remove).merge(bind)
}

fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
}
