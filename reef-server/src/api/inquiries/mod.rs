//! Inquiry (public Q&A) routes
//!
//! Anyone may ask, including anonymous visitors; staff with the right
//! permissions review and answer. Signed-in users can list their own
//! inquiries regardless of staff permissions.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::{require_auth, require_permissions};
use crate::core::AppState;
use crate::services::rate_limit;

pub fn router(state: &AppState) -> Router<AppState> {
    let review = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_permissions(&["VIEW_INQUIRIES"])));

    let staff = Router::new()
        .route("/{id}/answer", post(handler::answer))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permissions(&["ANSWER_INQUIRY"])));

    let mine = Router::new()
        .route("/mine", get(handler::list_mine))
        .layer(middleware::from_fn(require_auth));

    let submit = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit("inquiry"),
        ));

    let read_one = Router::new().route("/{id}", get(handler::get_by_id));

    Router::new().nest(
        "/api/inquiry",
        review.merge(staff).merge(mine).merge(submit).merge(read_one),
    )
}
