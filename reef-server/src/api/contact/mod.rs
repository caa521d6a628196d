//! Contact form route

mod handler;

use axum::{Router, middleware, routing::post};

use crate::core::AppState;
use crate::services::rate_limit;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(handler::submit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit("contact"),
        ))
}
