//! User storage
//!
//! Users plus their ordered role bindings. The `user_roles.position`
//! column preserves bind order so role lists come back the way the
//! operator arranged them.

use sqlx::SqlitePool;

use shared::models::{Role, User, UserWithRoles};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

#[derive(sqlx::FromRow)]
struct UserRoleRow {
    user_id: i64,
    #[sqlx(flatten)]
    role: Role,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Roles bound to a user, in bind order
pub async fn find_roles(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Role>> {
    let roles = sqlx::query_as(
        "SELECT r.* FROM roles r
         JOIN user_roles ur ON ur.role_id = r.id
         WHERE ur.user_id = ?
         ORDER BY ur.position ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn find_with_roles(pool: &SqlitePool, id: i64) -> RepoResult<Option<UserWithRoles>> {
    let Some(user) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let roles = find_roles(pool, id).await?;
    Ok(Some(UserWithRoles { user, roles }))
}

/// All users with their roles, newest first. One query for users, one for
/// all bindings, grouped in memory.
pub async fn find_all_with_roles(pool: &SqlitePool) -> RepoResult<Vec<UserWithRoles>> {
    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await?;

    let rows: Vec<UserRoleRow> = sqlx::query_as(
        "SELECT ur.user_id, r.* FROM roles r
         JOIN user_roles ur ON ur.role_id = r.id
         ORDER BY ur.user_id ASC, ur.position ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut by_user: std::collections::HashMap<i64, Vec<Role>> = std::collections::HashMap::new();
    for row in rows {
        by_user.entry(row.user_id).or_default().push(row.role);
    }

    Ok(users
        .into_iter()
        .map(|user| {
            let roles = by_user.remove(&user.id).unwrap_or_default();
            UserWithRoles { user, roles }
        })
        .collect())
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    display_name: Option<&str>,
) -> RepoResult<User> {
    let now = now_millis();
    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(display_name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("User vanished after insert".into()))
}

/// Persist profile fields of an already-merged user
pub async fn update(pool: &SqlitePool, user: &User) -> RepoResult<User> {
    sqlx::query(
        "UPDATE users SET username = ?, email = ?, display_name = ?, avatar_url = ?, is_active = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.display_name)
    .bind(&user.avatar_url)
    .bind(user.is_active)
    .bind(now_millis())
    .bind(user.id)
    .execute(pool)
    .await?;

    find_by_id(pool, user.id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {} not found", user.id)))
}

pub async fn update_password(
    pool: &SqlitePool,
    user_id: i64,
    password_hash: &str,
) -> RepoResult<()> {
    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now_millis())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Replace a user's role bindings, preserving the given order
pub async fn set_roles(pool: &SqlitePool, user_id: i64, role_ids: &[i64]) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (position, role_id) in role_ids.iter().enumerate() {
        sqlx::query("INSERT INTO user_roles (user_id, role_id, position) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(role_id)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Append a role binding at the end of the user's role list
pub async fn add_role(pool: &SqlitePool, user_id: i64, role_id: i64) -> RepoResult<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO user_roles (user_id, role_id, position)
         SELECT ?, ?, COALESCE(MAX(position) + 1, 0) FROM user_roles WHERE user_id = ?",
    )
    .bind(user_id)
    .bind(role_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Whether the user holds any SYSTEM role
pub async fn has_system_role(pool: &SqlitePool, user_id: i64) -> RepoResult<bool> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM user_roles ur
         JOIN roles r ON r.id = ur.role_id
         WHERE ur.user_id = ? AND r.kind = 'SYSTEM'",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}
