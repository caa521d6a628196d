//! Key-value settings storage

use sqlx::SqlitePool;

use shared::models::Setting;
use shared::util::now_millis;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Setting>> {
    let settings = sqlx::query_as("SELECT * FROM settings ORDER BY key ASC")
        .fetch_all(pool)
        .await?;
    Ok(settings)
}

pub async fn find_by_key(pool: &SqlitePool, key: &str) -> RepoResult<Option<Setting>> {
    let setting = sqlx::query_as("SELECT * FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(setting)
}

/// Insert or replace a setting value
pub async fn upsert(
    pool: &SqlitePool,
    key: &str,
    value: &serde_json::Value,
) -> RepoResult<Setting> {
    let raw = serde_json::to_string(value)
        .map_err(|e| RepoError::Validation(format!("Invalid setting value: {e}")))?;

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(&raw)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find_by_key(pool, key)
        .await?
        .ok_or_else(|| RepoError::Database("Setting vanished after upsert".into()))
}

pub async fn delete(pool: &SqlitePool, key: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
