//! Inquiry storage

use sqlx::SqlitePool;

use shared::models::{Inquiry, InquiryCreate, InquiryStatus};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Inquiry>> {
    let inquiries = sqlx::query_as("SELECT * FROM inquiries ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;
    Ok(inquiries)
}

/// Inquiries created by one author (their own list)
pub async fn find_by_author(pool: &SqlitePool, author_id: i64) -> RepoResult<Vec<Inquiry>> {
    let inquiries =
        sqlx::query_as("SELECT * FROM inquiries WHERE author_id = ? ORDER BY created_at DESC")
            .bind(author_id)
            .fetch_all(pool)
            .await?;
    Ok(inquiries)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Inquiry>> {
    let inquiry = sqlx::query_as("SELECT * FROM inquiries WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(inquiry)
}

pub async fn create(
    pool: &SqlitePool,
    author_id: Option<i64>,
    data: &InquiryCreate,
) -> RepoResult<Inquiry> {
    let result = sqlx::query(
        "INSERT INTO inquiries (author_id, title, content, status, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(author_id)
    .bind(&data.title)
    .bind(&data.content)
    .bind(InquiryStatus::Open)
    .bind(now_millis())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Inquiry vanished after insert".into()))
}

/// Record an answer and close the inquiry
pub async fn answer(
    pool: &SqlitePool,
    id: i64,
    answered_by: i64,
    answer: &str,
) -> RepoResult<Inquiry> {
    sqlx::query(
        "UPDATE inquiries SET answer = ?, answered_by = ?, status = ?, answered_at = ? WHERE id = ?",
    )
    .bind(answer)
    .bind(answered_by)
    .bind(InquiryStatus::Answered)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Inquiry {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM inquiries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
