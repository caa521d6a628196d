//! Authentication routes
//!
//! | Path | Method | Guard |
//! |------|--------|-------|
//! | /api/auth/signup | POST | rate limit |
//! | /api/auth/login | POST | rate limit |
//! | /api/auth/refresh | POST | none (refresh token is the credential) |
//! | /api/auth/logout | POST | none (idempotent) |
//! | /api/auth/me | GET | signed-in user |
//! | /api/auth/password | PUT | signed-in user |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_auth;
use crate::core::AppState;
use crate::services::rate_limit;

pub fn router(state: &AppState) -> Router<AppState> {
    // Account creation and credential checks get separate buckets so a
    // burst against one form does not lock out the other
    let signup = Router::new()
        .route("/api/auth/signup", post(handler::signup))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit("signup"),
        ));

    let login = Router::new()
        .route("/api/auth/login", post(handler::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit("login"),
        ));

    let session = Router::new()
        .route("/api/auth/refresh", post(handler::refresh))
        .route("/api/auth/logout", post(handler::logout));

    let protected = Router::new()
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/password", put(handler::change_password))
        .layer(middleware::from_fn(require_auth));

    signup.merge(login).merge(session).merge(protected)
}
