//! Partner directory routes
//!
//! The directory is public site content; only writes are guarded.

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
        .route("/{id}", get(handler::get_by_id));

    let edit = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permissions(&["EDIT_BUSINESS"])));

    let remove = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&[
            "DELETE_BUSINESS",
        ])));

    Router::new().nest("/api/businesses", public.merge(edit).merge(remove))
}
