//! Business directory storage

use sqlx::SqlitePool;

use shared::models::{Business, BusinessCreate};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Business>> {
    let businesses = sqlx::query_as("SELECT * FROM businesses ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(businesses)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Business>> {
    let business = sqlx::query_as("SELECT * FROM businesses WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(business)
}

pub async fn create(pool: &SqlitePool, data: &BusinessCreate) -> RepoResult<Business> {
    let now = now_millis();
    let result = sqlx::query(
        "INSERT INTO businesses (name, url, description, logo_file_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&data.name)
    .bind(&data.url)
    .bind(&data.description)
    .bind(data.logo_file_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Business vanished after insert".into()))
}

pub async fn update(pool: &SqlitePool, business: &Business) -> RepoResult<Business> {
    sqlx::query(
        "UPDATE businesses SET name = ?, url = ?, description = ?, logo_file_id = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&business.name)
    .bind(&business.url)
    .bind(&business.description)
    .bind(business.logo_file_id)
    .bind(now_millis())
    .bind(business.id)
    .execute(pool)
    .await?;

    find_by_id(pool, business.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Business {} not found", business.id)))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM businesses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
