//! Newsletter storage

use sqlx::SqlitePool;

use shared::models::{Newsletter, NewsletterCreate, NewsletterStatus};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Newsletter>> {
    let newsletters = sqlx::query_as("SELECT * FROM newsletters ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;
    Ok(newsletters)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Newsletter>> {
    let newsletter = sqlx::query_as("SELECT * FROM newsletters WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(newsletter)
}

pub async fn create(pool: &SqlitePool, data: &NewsletterCreate) -> RepoResult<Newsletter> {
    let now = now_millis();
    let result = sqlx::query(
        "INSERT INTO newsletters (subject, body, status, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&data.subject)
    .bind(&data.body)
    .bind(NewsletterStatus::Draft)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Newsletter vanished after insert".into()))
}

/// Update subject and body. Only drafts are editable; the caller checks.
pub async fn update(pool: &SqlitePool, newsletter: &Newsletter) -> RepoResult<Newsletter> {
    sqlx::query("UPDATE newsletters SET subject = ?, body = ? WHERE id = ?")
        .bind(&newsletter.subject)
        .bind(&newsletter.body)
        .bind(newsletter.id)
        .execute(pool)
        .await?;

    find_by_id(pool, newsletter.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Newsletter {} not found", newsletter.id)))
}

/// Mark a newsletter as sent
pub async fn mark_sent(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE newsletters SET status = ?, sent_at = ? WHERE id = ?")
        .bind(NewsletterStatus::Sent)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM newsletters WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
