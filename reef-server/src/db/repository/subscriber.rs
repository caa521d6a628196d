//! Newsletter subscriber storage

use sqlx::SqlitePool;

use shared::models::Subscriber;
use shared::util::now_millis;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Subscriber>> {
    let subscribers = sqlx::query_as("SELECT * FROM subscribers ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;
    Ok(subscribers)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Subscriber>> {
    let subscriber = sqlx::query_as("SELECT * FROM subscribers WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(subscriber)
}

pub async fn create(pool: &SqlitePool, email: &str) -> RepoResult<Subscriber> {
    let result = sqlx::query("INSERT INTO subscribers (email, created_at) VALUES (?, ?)")
        .bind(email)
        .bind(now_millis())
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    let subscriber = sqlx::query_as("SELECT * FROM subscribers WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    subscriber.ok_or_else(|| RepoError::Database("Subscriber vanished after insert".into()))
}

/// Remove a subscriber by email. Idempotent.
pub async fn delete_by_email(pool: &SqlitePool, email: &str) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM subscribers WHERE email = ?")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
