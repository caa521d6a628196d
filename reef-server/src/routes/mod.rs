//! Router assembly
//!
//! [`build_router`] registers every API route; [`build_app`] wraps the
//! result in the middleware stack and attaches the state. The last
//! layer added runs first, so identity resolution sits outermost and
//! every route guard below it can read the request extensions.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::auth_context;
use crate::core::{AppState, Config};

/// Request body cap for JSON endpoints; the file content route raises
/// its own limit
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(api::auth::router(state))
        .merge(api::users::router())
        .merge(api::roles::router())
        .merge(api::pages::router())
        .merge(api::settings::router())
        .merge(api::newsletters::router(state))
        .merge(api::inquiries::router(state))
        .merge(api::businesses::router())
        .merge(api::files::router())
        .merge(api::contact::router(state))
        .merge(api::health::router())
}

/// Cookies only cross origins when the browser is told exactly which
/// origin to trust, so a configured origin switches CORS into
/// credentialed mode. Without one the API is same-origin (or non-browser)
/// and the permissive default is fine.
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = config
        .cors_origin
        .as_deref()
        .and_then(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring unparseable CORS_ORIGIN");
                None
            }
        });

    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::permissive(),
    }
}

/// Build the fully configured application
pub fn build_app(state: AppState) -> Router {
    build_router(&state)
        // ========== Tower HTTP Middleware ==========
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        // ========== Application Middleware ==========
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Identity resolution runs first and injects CurrentUser
        .layer(middleware::from_fn_with_state(state.clone(), auth_context))
        .with_state(state)
}
