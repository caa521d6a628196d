//! Uploaded file metadata storage
//!
//! Rows are created in PENDING state when an upload URL is signed and
//! flipped to UPLOADED once the bytes actually arrive.

use sqlx::SqlitePool;

use shared::models::{FileStatus, StoredFile, StoredFileCreate};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<StoredFile>> {
    let files = sqlx::query_as("SELECT * FROM files ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;
    Ok(files)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<StoredFile>> {
    let file = sqlx::query_as("SELECT * FROM files WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(file)
}

pub async fn create(
    pool: &SqlitePool,
    data: &StoredFileCreate,
    storage_key: &str,
    owner_id: Option<i64>,
) -> RepoResult<StoredFile> {
    let result = sqlx::query(
        "INSERT INTO files (file_name, content_type, size, status, storage_key, owner_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&data.file_name)
    .bind(&data.content_type)
    .bind(data.size)
    .bind(FileStatus::Pending)
    .bind(storage_key)
    .bind(owner_id)
    .bind(now_millis())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("File vanished after insert".into()))
}

/// Mark a pending file as uploaded, recording the actual byte count
pub async fn mark_uploaded(pool: &SqlitePool, id: i64, size: i64) -> RepoResult<()> {
    sqlx::query("UPDATE files SET status = ?, size = ?, uploaded_at = ? WHERE id = ?")
        .bind(FileStatus::Uploaded)
        .bind(size)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM files WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
