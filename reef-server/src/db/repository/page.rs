//! Page storage

use sqlx::SqlitePool;

use shared::models::{Page, PageCreate};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool, published_only: bool) -> RepoResult<Vec<Page>> {
    let sql = if published_only {
        "SELECT * FROM pages WHERE is_published = 1 ORDER BY updated_at DESC"
    } else {
        "SELECT * FROM pages ORDER BY updated_at DESC"
    };
    let pages = sqlx::query_as(sql).fetch_all(pool).await?;
    Ok(pages)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Page>> {
    let page = sqlx::query_as("SELECT * FROM pages WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(page)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Page>> {
    let page = sqlx::query_as("SELECT * FROM pages WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(page)
}

pub async fn create(pool: &SqlitePool, data: &PageCreate) -> RepoResult<Page> {
    let now = now_millis();
    let content = serde_json::to_string(&data.content)
        .map_err(|e| RepoError::Validation(format!("Invalid page content: {e}")))?;

    let result = sqlx::query(
        "INSERT INTO pages (slug, title, content, is_published, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&data.slug)
    .bind(&data.title)
    .bind(&content)
    .bind(data.is_published)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Page vanished after insert".into()))
}

pub async fn update(pool: &SqlitePool, page: &Page) -> RepoResult<Page> {
    let content = serde_json::to_string(&page.content)
        .map_err(|e| RepoError::Validation(format!("Invalid page content: {e}")))?;

    sqlx::query(
        "UPDATE pages SET slug = ?, title = ?, content = ?, is_published = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&page.slug)
    .bind(&page.title)
    .bind(&content)
    .bind(page.is_published)
    .bind(now_millis())
    .bind(page.id)
    .execute(pool)
    .await?;

    find_by_id(pool, page.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Page {} not found", page.id)))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM pages WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
