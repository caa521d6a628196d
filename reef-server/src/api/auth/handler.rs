//! Authentication handlers
//!
//! Sessions ride in two HttpOnly cookies: a short-lived access token and
//! a long-lived refresh token bound server-side to the user and device.
//! Non-browser clients may send the tokens via the Authorization header
//! and the request body instead.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::response::{AppendHeaders, IntoResponse};
use http::{HeaderMap, HeaderName, StatusCode, header};
use serde::{Deserialize, Serialize};

use shared::models::UserWithRoles;
use shared::util::now_millis;

use crate::auth::CurrentUser;
use crate::auth::middleware::{ACCESS_COOKIE, REFRESH_COOKIE, get_cookie};
use crate::auth::session::{self, DEFAULT_DEVICE, TokenPair};
use crate::core::AppState;
use crate::db::repository::user;
use crate::db::seed;
use crate::security_log;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{
    MAX_USERNAME_LEN, validate_email_format, validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Fixed delay on credential checks so response timing does not reveal
/// whether the email exists
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub device_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub device_name: Option<String>,
}

/// Body fallback for clients that do not use cookies
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Session opened: the account plus the token pair. Browsers can ignore
/// the token fields and rely on the cookies set alongside.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserWithRoles,
    #[serde(flatten)]
    pub tokens: TokenPairResponse,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub access_token_expiry: i64,
    pub refresh_token: String,
    pub refresh_token_expiry: i64,
}

impl From<&TokenPair> for TokenPairResponse {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access.token.clone(),
            access_token_expiry: pair.access.expires_at,
            refresh_token: pair.refresh.token.clone(),
            refresh_token_expiry: pair.refresh.expires_at,
        }
    }
}

type SessionHeaders = AppendHeaders<[(HeaderName, String); 2]>;

/// Session cookie string. HttpOnly keeps tokens out of script reach,
/// SameSite=Strict keeps them off cross-site requests, and Secure is
/// added outside development.
fn cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut c =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}");
    if secure {
        c.push_str("; Secure");
    }
    c
}

fn session_cookies(state: &AppState, pair: &TokenPair) -> SessionHeaders {
    let secure = state.config.is_production();
    let now = now_millis();
    let access_age = ((pair.access.expires_at - now) / 1000).max(0);
    let refresh_age = ((pair.refresh.expires_at - now) / 1000).max(0);
    AppendHeaders([
        (
            header::SET_COOKIE,
            cookie(ACCESS_COOKIE, &pair.access.token, access_age, secure),
        ),
        (
            header::SET_COOKIE,
            cookie(REFRESH_COOKIE, &pair.refresh.token, refresh_age, secure),
        ),
    ])
}

fn clear_session_cookies(state: &AppState) -> SessionHeaders {
    let secure = state.config.is_production();
    AppendHeaders([
        (header::SET_COOKIE, cookie(ACCESS_COOKIE, "", 0, secure)),
        (header::SET_COOKIE, cookie(REFRESH_COOKIE, "", 0, secure)),
    ])
}

/// POST /api/auth/signup - Create an account and open a session
///
/// New accounts start with the signup role and nothing else.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    validate_required_text(&req.username, "username", MAX_USERNAME_LEN)?;
    validate_email_format(&req.email)?;
    validate_password(&req.password)?;

    if user::find_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists));
    }
    if user::find_by_username(&state.pool, &req.username)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::UsernameExists));
    }

    let hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    let created = user::create(
        &state.pool,
        &req.username,
        &req.email,
        &hash,
        req.display_name.as_deref(),
    )
    .await?;

    if let Some(role_id) = seed::guest_role_id(&state.pool).await? {
        user::add_role(&state.pool, created.id, role_id).await?;
    }

    let device = req.device_name.as_deref().unwrap_or(DEFAULT_DEVICE);
    let pair = session::issue_pair(&state.pool, &state.tokens, created.id, device).await?;

    let account = user::find_with_roles(&state.pool, created.id)
        .await?
        .ok_or_else(|| AppError::internal("User vanished after signup"))?;

    tracing::info!(user_id = created.id, username = %created.username, "Account registered");

    let body = SessionResponse {
        tokens: TokenPairResponse::from(&pair),
        user: account,
    };
    Ok((
        StatusCode::CREATED,
        session_cookies(&state, &pair),
        Json(body),
    ))
}

/// POST /api/auth/login - Verify credentials and open a session
///
/// Unknown email and wrong password produce the same response after the
/// same delay.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let found = user::find_by_email(&state.pool, &req.email).await?;

    // Delay before inspecting the result keeps timing uniform
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(account) = found else {
        security_log!(WARN, "login_failed", email = %req.email, reason = "unknown email");
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    };

    if !verify_password(&req.password, &account.password_hash) {
        security_log!(WARN, "login_failed", email = %req.email, reason = "wrong password");
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    // Checked after the password so a disabled account is only revealed
    // to someone holding valid credentials
    if !account.is_active {
        security_log!(WARN, "login_failed", email = %req.email, reason = "account disabled");
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let device = req.device_name.as_deref().unwrap_or(DEFAULT_DEVICE);
    let pair = session::issue_pair(&state.pool, &state.tokens, account.id, device).await?;

    let with_roles = user::find_with_roles(&state.pool, account.id)
        .await?
        .ok_or_else(|| AppError::internal("User vanished after login"))?;

    tracing::info!(user_id = account.id, username = %account.username, "User logged in");

    let body = SessionResponse {
        tokens: TokenPairResponse::from(&pair),
        user: with_roles,
    };
    Ok((session_cookies(&state, &pair), Json(body)))
}

/// POST /api/auth/refresh - Trade the refresh token for a fresh access token
///
/// The token comes from the refresh cookie, or from the body for
/// non-browser clients. All failures collapse into the same 403.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<impl IntoResponse> {
    let token = get_cookie(&headers, REFRESH_COOKIE)
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .ok_or_else(|| AppError::new(ErrorCode::RefreshTokenRejected))?;

    let (user_id, pair) = session::refresh_session(
        &state.pool,
        &state.tokens,
        &token,
        state.config.jwt.rotate_within_days,
    )
    .await?;

    tracing::debug!(user_id, "Session refreshed");

    let body = TokenPairResponse::from(&pair);
    Ok((session_cookies(&state, &pair), Json(body)))
}

/// POST /api/auth/logout - Close the session
///
/// Revokes exactly the refresh token presented and clears both cookies.
/// Logging out twice, or with no session at all, succeeds the same way.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<impl IntoResponse> {
    let token =
        get_cookie(&headers, REFRESH_COOKIE).or_else(|| body.and_then(|Json(b)| b.refresh_token));

    if let Some(token) = token {
        session::logout(&state.pool, &token).await?;
    }

    Ok((clear_session_cookies(&state), Json(())))
}

/// GET /api/auth/me - Current account with roles
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<UserWithRoles>> {
    let body = user::find_with_roles(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(body))
}

/// PUT /api/auth/password - Change the account password
///
/// Every session is revoked afterwards; the client signs in again with
/// the new password.
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<PasswordChangeRequest>,
) -> AppResult<impl IntoResponse> {
    validate_password(&req.new_password)?;

    let account = user::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if !verify_password(&req.current_password, &account.password_hash) {
        security_log!(
            WARN,
            "password_change_failed",
            user_id = user.id,
            reason = "wrong current password"
        );
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let hash = hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    user::update_password(&state.pool, user.id, &hash).await?;
    session::revoke_user_sessions(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "Password changed, all sessions revoked");

    Ok((clear_session_cookies(&state), Json(())))
}
