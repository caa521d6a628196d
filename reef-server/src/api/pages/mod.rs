//! CMS page routes
//!
//! Reads are public; draft visibility is decided in the handlers so the
//! same routes serve visitors and editors.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permissions;
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    let public = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/slug/{slug}", get(handler::get_by_slug));

    let edit = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permissions(&["EDIT_PAGE"])));

    let remove = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&["DELETE_PAGE"])));

    Router::new().nest("/api/pages", public.merge(edit).merge(remove))
}
