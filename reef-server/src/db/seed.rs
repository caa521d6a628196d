//! Seed data
//!
//! Guarantees the minimum state the server cannot run without: one
//! SYSTEM role, one GUEST role and one administrator account bound to
//! the SYSTEM role. Runs on every startup and is idempotent.

use sqlx::SqlitePool;

use shared::models::RoleKind;
use shared::util::now_millis;

use crate::auth::permissions::{ALL_PERMISSIONS, FREE_PERMISSIONS};
use crate::core::Config;
use crate::db::repository::{user, RepoResult};
use crate::utils::AppError;

const ADMIN_ROLE_NAME: &str = "admin";
const GUEST_ROLE_NAME: &str = "guest";

/// Admin role sits above anything an operator can create
const ADMIN_ROLE_LEVEL: i64 = 100;
const GUEST_ROLE_LEVEL: i64 = 0;

pub async fn ensure_seed_data(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let admin_role_id = ensure_role(
        pool,
        ADMIN_ROLE_NAME,
        RoleKind::System,
        ADMIN_ROLE_LEVEL,
        ALL_PERMISSIONS,
        Some("#d32f2f"),
        false,
    )
    .await?;

    ensure_role(
        pool,
        GUEST_ROLE_NAME,
        RoleKind::Guest,
        GUEST_ROLE_LEVEL,
        FREE_PERMISSIONS,
        Some("#9e9e9e"),
        true,
    )
    .await?;

    ensure_admin_user(pool, config, admin_role_id).await?;

    Ok(())
}

/// Id of the role new signups are bound to
pub async fn guest_role_id(pool: &SqlitePool) -> RepoResult<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM roles WHERE kind = 'GUEST' LIMIT 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id,)| id))
}

async fn ensure_role(
    pool: &SqlitePool,
    name: &str,
    kind: RoleKind,
    level: i64,
    permissions: &[&str],
    color: Option<&str>,
    locked: bool,
) -> Result<i64, AppError> {
    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM roles WHERE kind = ? LIMIT 1")
        .bind(kind)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if let Some((id,)) = existing {
        // Seeded permission sets track the catalog across releases
        let raw = serde_json::to_string(permissions)
            .map_err(|e| AppError::internal(e.to_string()))?;
        sqlx::query("UPDATE roles SET permissions = ?, updated_at = ? WHERE id = ?")
            .bind(&raw)
            .bind(now_millis())
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        return Ok(id);
    }

    let now = now_millis();
    let raw = serde_json::to_string(permissions).map_err(|e| AppError::internal(e.to_string()))?;
    let result = sqlx::query(
        "INSERT INTO roles (name, kind, level, permissions, color, permissions_locked, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(name)
    .bind(kind)
    .bind(level)
    .bind(&raw)
    .bind(color)
    .bind(locked)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!("Seeded {} role '{name}' (level {level})", kind.as_str());
    Ok(result.last_insert_rowid())
}

async fn ensure_admin_user(
    pool: &SqlitePool,
    config: &Config,
    admin_role_id: i64,
) -> Result<(), AppError> {
    let (system_users,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM user_roles ur JOIN roles r ON r.id = ur.role_id WHERE r.kind = 'SYSTEM'",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::database(e.to_string()))?;

    if system_users > 0 {
        return Ok(());
    }

    let admin = match user::find_by_email(pool, &config.admin_email).await? {
        Some(existing) => existing,
        None => {
            let hash = crate::utils::password::hash_password(&config.admin_password)
                .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
            user::create(
                pool,
                &config.admin_username,
                &config.admin_email,
                &hash,
                Some("Administrator"),
            )
            .await?
        }
    };

    user::add_role(pool, admin.id, admin_role_id).await?;
    tracing::info!("Seeded administrator account '{}'", config.admin_email);
    Ok(())
}
