//! Session lifecycle
//!
//! Issues the access/refresh pair, validates refresh attempts against
//! stored digests and applies the rotation policy. Refresh failures are
//! all reported as the same rejection so callers learn nothing about
//! why a token was refused.

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::db::repository::session;
use crate::security_log;

use super::jwt::{IssuedToken, TokenService};

/// Fallback device identity when the client does not name one
pub const DEFAULT_DEVICE: &str = "web";

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// A freshly issued access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// SHA-256 hex digest of a token string. Only digests ever reach the
/// database.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issue a new pair for a user+device, replacing the device's previous
/// refresh binding
pub async fn issue_pair(
    pool: &SqlitePool,
    tokens: &TokenService,
    user_id: i64,
    device_name: &str,
) -> Result<TokenPair, AppError> {
    let access = tokens.generate_access_token(user_id)?;
    let refresh = tokens.generate_refresh_token(user_id)?;

    session::create(
        pool,
        user_id,
        device_name,
        &hash_token(&refresh.token),
        refresh.expires_at,
    )
    .await?;

    Ok(TokenPair { access, refresh })
}

/// Validate a refresh token and mint a new access token.
///
/// The stored digest is the single source of truth: a signature-valid
/// token whose digest is gone was revoked and is rejected. When less
/// than `rotate_within_days` of lifetime remains the refresh token is
/// rotated; otherwise the original token is returned unchanged.
pub async fn refresh_session(
    pool: &SqlitePool,
    tokens: &TokenService,
    refresh_token: &str,
    rotate_within_days: i64,
) -> Result<(i64, TokenPair), AppError> {
    let rejected = || AppError::new(ErrorCode::RefreshTokenRejected);

    let claims = match tokens.validate_refresh_token(refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(WARN, "refresh_rejected", reason = %e);
            return Err(rejected());
        }
    };

    let hash = hash_token(refresh_token);
    let Some(row) = session::find_by_hash(pool, &hash).await? else {
        security_log!(WARN, "refresh_rejected", reason = "unknown or revoked token");
        return Err(rejected());
    };

    let now = now_millis();
    if row.expires_at <= now {
        session::revoke_by_hash(pool, &hash).await?;
        security_log!(WARN, "refresh_rejected", reason = "expired binding", user_id = row.user_id);
        return Err(rejected());
    }

    // The signed subject and the stored binding must agree
    if claims.user_id() != Some(row.user_id) {
        security_log!(WARN, "refresh_rejected", reason = "subject mismatch", user_id = row.user_id);
        return Err(rejected());
    }

    let access = tokens.generate_access_token(row.user_id)?;

    let remaining = row.expires_at - now;
    let refresh = if remaining < rotate_within_days * DAY_MS {
        let rotated = tokens.generate_refresh_token(row.user_id)?;
        session::create(
            pool,
            row.user_id,
            &row.device_name,
            &hash_token(&rotated.token),
            rotated.expires_at,
        )
        .await?;
        rotated
    } else {
        IssuedToken {
            token: refresh_token.to_string(),
            expires_at: row.expires_at,
        }
    };

    Ok((row.user_id, TokenPair { access, refresh }))
}

/// Revoke the exact token presented at logout. Unknown tokens succeed:
/// logging out twice is not an error.
pub async fn logout(pool: &SqlitePool, refresh_token: &str) -> Result<(), AppError> {
    session::revoke_by_hash(pool, &hash_token(refresh_token)).await?;
    Ok(())
}

/// Drop every session of a user (password change, account removal)
pub async fn revoke_user_sessions(pool: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    session::revoke_all(pool, user_id).await?;
    Ok(())
}
