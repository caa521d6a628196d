//! Refresh token storage
//!
//! One active refresh token per (user, device). Tokens are stored as
//! SHA-256 digests so a database leak never exposes usable tokens, and
//! lookup stays a single indexed query.

use sqlx::SqlitePool;

use shared::util::now_millis;

use super::RepoResult;

#[derive(Debug, sqlx::FromRow)]
pub struct RefreshTokenRow {
    pub id: i64,
    pub user_id: i64,
    pub device_name: String,
    pub token_hash: String,
    pub expires_at: i64,
    pub created_at: i64,
}

/// Store a refresh token digest, replacing any previous token for this
/// user+device pair
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    device_name: &str,
    token_hash: &str,
    expires_at: i64,
) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ? AND device_name = ?")
        .bind(user_id)
        .bind(device_name)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO refresh_tokens (user_id, device_name, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(device_name)
    .bind(token_hash)
    .bind(expires_at)
    .bind(now_millis())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Indexed digest lookup. A missing row means the token was revoked or
/// never issued; both cases are indistinguishable to the caller on purpose.
pub async fn find_by_hash(
    pool: &SqlitePool,
    token_hash: &str,
) -> RepoResult<Option<RefreshTokenRow>> {
    let row = sqlx::query_as("SELECT * FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Revoke a single token by digest
pub async fn revoke_by_hash(pool: &SqlitePool, token_hash: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Revoke the token bound to a user+device. Idempotent: revoking an
/// absent binding succeeds.
pub async fn revoke_device(pool: &SqlitePool, user_id: i64, device_name: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ? AND device_name = ?")
        .bind(user_id)
        .bind(device_name)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke every session of a user (password change, account deletion)
pub async fn revoke_all(pool: &SqlitePool, user_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Purge expired tokens. Called periodically in the background.
pub async fn delete_expired(pool: &SqlitePool) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
        .bind(now_millis())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
