//! File storage routes
//!
//! Upload is a two-step handshake: POST registers the file and returns a
//! short-lived signed URL, PUT on that URL delivers the bytes. The PUT
//! and the public GET carry no session; the signature (or the uploaded
//! state) is the credential.

mod handler;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permissions;
use crate::core::AppState;

pub fn router() -> Router<AppState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permissions(&["VIEW_FILES"])));

    let upload = Router::new()
        .route("/", post(handler::request_upload))
        .layer(middleware::from_fn(require_permissions(&["UPLOAD_FILE"])));

    let remove = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&["DELETE_FILE"])));

    let content = Router::new()
        .route(
            "/{id}/content",
            put(handler::upload_content).get(handler::serve_content),
        )
        .layer(DefaultBodyLimit::max(handler::MAX_UPLOAD_BYTES));

    Router::new().nest("/api/files", read.merge(upload).merge(remove).merge(content))
}
