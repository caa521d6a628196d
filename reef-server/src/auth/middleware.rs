//! Authentication middleware
//!
//! Identity resolution is optional and uniform: [`auth_context`] runs on
//! every API route, resolves a user when it can and stays silent when it
//! cannot. Route protection is separate and explicit: [`require_auth`]
//! for login-only routes, [`require_permissions`] /
//! [`require_any_permission`] for permission-guarded ones.
//!
//! # Failure surface
//!
//! | Situation | Result |
//! |-----------|--------|
//! | No credentials on a public route | handler runs anonymously |
//! | Expired access token | treated as anonymous, no log line |
//! | Malformed/forged access token | treated as anonymous, logged |
//! | No user on a `require_auth` route | 401 Unauthorized |
//! | Failed permission check (signed in or not) | 403 Forbidden |

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;

use shared::error::{AppError, ErrorCode};

use crate::auth::evaluator::{self, CurrentUser};
use crate::auth::jwt::{JwtError, TokenService};
use crate::core::AppState;
use crate::db::repository::user;
use crate::security_log;

/// Cookie carrying the access token
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Read a cookie value from the Cookie header
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(http::header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next()?;
            (key == name).then(|| value.to_string())
        })
}

/// Access token from the Authorization header, falling back to the
/// access cookie
fn access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(header) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        && let Some(token) = TokenService::extract_from_header(header)
    {
        return Some(token.to_string());
    }
    get_cookie(headers, ACCESS_COOKIE)
}

/// Optional identity resolution
///
/// Never fails a request. Inserts [`CurrentUser`] into the request
/// extensions when a valid access token maps to an active user; in every
/// other case the request continues anonymously.
pub async fn auth_context(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(user) = resolve_user(&state, req.headers()).await {
        req.extensions_mut().insert(user);
    }
    next.run(req).await
}

async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = access_token(headers)?;

    let claims = match state.tokens.validate_access_token(&token) {
        Ok(claims) => claims,
        // Expired tokens resolve to anonymous with no log line; clients
        // refresh and retry as part of normal operation
        Err(JwtError::ExpiredToken) => return None,
        Err(e) => {
            tracing::debug!("Access token rejected: {e}");
            return None;
        }
    };

    let user_id = claims.user_id()?;
    match user::find_with_roles(&state.pool, user_id).await {
        Ok(Some(u)) if u.user.is_active => Some(CurrentUser::from(u)),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Failed to load user {user_id} for auth context: {e}");
            None
        }
    }
}

/// Require a signed-in user. 401 otherwise.
pub async fn require_auth(req: Request, next: Next) -> Result<Response, AppError> {
    if req.extensions().get::<CurrentUser>().is_none() {
        security_log!(WARN, "auth_missing", uri = %req.uri());
        return Err(AppError::new(ErrorCode::NotAuthenticated));
    }
    Ok(next.run(req).await)
}

/// Require every listed permission. 403 otherwise, signed in or not.
pub fn require_permissions(
    required: &'static [&'static str],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    permission_layer(required, true)
}

/// Require at least one of the listed permissions. 403 otherwise.
pub fn require_any_permission(
    required: &'static [&'static str],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    permission_layer(required, false)
}

fn permission_layer(
    required: &'static [&'static str],
    check_all: bool,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req.extensions().get::<CurrentUser>();

            if !evaluator::check_permission(user, required, check_all) {
                match user {
                    Some(user) => security_log!(
                        WARN,
                        "permission_denied",
                        user_id = user.id,
                        username = %user.username,
                        required = ?required
                    ),
                    None => security_log!(
                        WARN,
                        "permission_denied",
                        user_id = "anonymous",
                        required = ?required
                    ),
                }
                return Err(AppError::new(ErrorCode::PermissionDenied));
            }

            Ok(next.run(req).await)
        })
    }
}
