//! Role storage

use sqlx::SqlitePool;

use shared::models::{Role, RoleCreate, RoleKind};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

/// All roles, highest authority first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as("SELECT * FROM roles ORDER BY level DESC, id ASC")
        .fetch_all(pool)
        .await?;
    Ok(roles)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as("SELECT * FROM roles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(role)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Role>> {
    let role = sqlx::query_as("SELECT * FROM roles WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(role)
}

/// Load a set of roles by id. Missing ids are simply absent from the result.
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Role>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT * FROM roles WHERE id IN ({placeholders}) ORDER BY level DESC");
    let mut query = sqlx::query_as(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let roles = query.fetch_all(pool).await?;
    Ok(roles)
}

/// Create a custom role. System and guest roles only come from seeding.
pub async fn create(pool: &SqlitePool, data: &RoleCreate) -> RepoResult<Role> {
    let now = now_millis();
    let permissions = serde_json::to_string(&data.permissions)
        .map_err(|e| RepoError::Validation(format!("Invalid permissions payload: {e}")))?;

    let result = sqlx::query(
        "INSERT INTO roles (name, kind, level, permissions, color, permissions_locked, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(&data.name)
    .bind(RoleKind::Custom)
    .bind(data.level)
    .bind(&permissions)
    .bind(&data.color)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Role vanished after insert".into()))
}

/// Persist name, level, permissions and color of an already-merged role
pub async fn update(pool: &SqlitePool, role: &Role) -> RepoResult<Role> {
    let permissions = serde_json::to_string(&role.permissions)
        .map_err(|e| RepoError::Validation(format!("Invalid permissions payload: {e}")))?;

    sqlx::query(
        "UPDATE roles SET name = ?, level = ?, permissions = ?, color = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&role.name)
    .bind(role.level)
    .bind(&permissions)
    .bind(&role.color)
    .bind(now_millis())
    .bind(role.id)
    .execute(pool)
    .await?;

    find_by_id(pool, role.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Role {} not found", role.id)))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM roles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Number of users currently bound to this role
pub async fn count_bound_users(pool: &SqlitePool, role_id: i64) -> RepoResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_roles WHERE role_id = ?")
        .bind(role_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
