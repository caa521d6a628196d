//! Role management handlers
//!
//! Two independent rules guard every mutation:
//!
//! 1. Authority: the actor must outrank the role touched, and a role can
//!    never be created at or moved to a level the actor does not outrank.
//! 2. Delegation: granted permissions are limited to what the actor
//!    holds, plus the free set everyone has.
//!
//! The role kind adds categorical limits on top: SYSTEM roles are
//! immutable and undeletable, and the signup role keeps its permission
//! set fixed.

use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;
use serde::Serialize;

use shared::models::{Role, RoleCreate, RoleUpdate};

use crate::auth::permissions::{ALL_PERMISSIONS, FREE_PERMISSIONS, is_valid_permission};
use crate::auth::{CurrentUser, evaluator};
use crate::core::AppState;
use crate::db::repository::role;
use crate::security_log;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// The permission catalog, split into the full set and the free subset
/// granted implicitly to everyone
#[derive(Debug, Serialize)]
pub struct PermissionCatalog {
    pub all: Vec<&'static str>,
    pub free: Vec<&'static str>,
}

/// Unknown names are rejected outright; known ones must be delegable by
/// the actor
fn validate_delegation(actor: &CurrentUser, permissions: &[String]) -> Result<(), AppError> {
    for perm in permissions {
        if !is_valid_permission(perm) {
            return Err(AppError::with_message(
                ErrorCode::InvalidPermission,
                format!("Unknown permission: {perm}"),
            ));
        }
    }

    let undelegable = evaluator::undelegable_permissions(actor, permissions);
    if !undelegable.is_empty() {
        security_log!(
            WARN,
            "delegation_denied",
            actor_id = actor.id,
            permissions = ?undelegable
        );
        return Err(AppError::with_message(
            ErrorCode::PermissionNotDelegable,
            format!(
                "Cannot grant permissions you do not hold: {}",
                undelegable.join(", ")
            ),
        )
        .with_detail("permissions", serde_json::json!(undelegable)));
    }
    Ok(())
}

/// GET /api/roles - All roles, highest level first
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Role>>> {
    let roles = role::find_all(&state.pool).await?;
    Ok(Json(roles))
}

/// GET /api/roles/permissions - The permission catalog
pub async fn permission_catalog() -> Json<PermissionCatalog> {
    Json(PermissionCatalog {
        all: ALL_PERMISSIONS.to_vec(),
        free: FREE_PERMISSIONS.to_vec(),
    })
}

/// GET /api/roles/{id} - One role
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    let found = role::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;
    Ok(Json(found))
}

/// POST /api/roles - Create a custom role
pub async fn create(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<RoleCreate>,
) -> AppResult<(StatusCode, Json<Role>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    if !evaluator::outranks(&actor, payload.level) {
        return Err(AppError::with_message(
            ErrorCode::AuthorityTooLow,
            "Cannot create a role at or above your own authority",
        ));
    }
    validate_delegation(&actor, &payload.permissions)?;

    if role::find_by_name(&state.pool, &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::RoleNameExists));
    }

    let created = role::create(&state.pool, &payload).await?;
    tracing::info!(
        actor_id = actor.id,
        role_id = created.id,
        name = %created.name,
        level = created.level,
        "Role created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/roles/{id} - Update a role
///
/// The level check runs twice when the level moves: the actor must
/// outrank where the role is now and where it is going.
pub async fn update(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    let mut target = role::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;

    if !target.kind.can_edit() {
        security_log!(WARN, "system_role_edit_blocked", actor_id = actor.id, role_id = id);
        return Err(AppError::new(ErrorCode::SystemRoleProtected));
    }
    if !evaluator::outranks(&actor, target.level) {
        return Err(AppError::with_message(
            ErrorCode::AuthorityTooLow,
            "Cannot edit a role at or above your own authority",
        ));
    }

    if let Some(name) = payload.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        if name != target.name && role::find_by_name(&state.pool, &name).await?.is_some() {
            return Err(AppError::new(ErrorCode::RoleNameExists));
        }
        target.name = name;
    }
    if let Some(level) = payload.level {
        if level != target.level && !evaluator::outranks(&actor, level) {
            return Err(AppError::with_message(
                ErrorCode::AuthorityTooLow,
                "Cannot move a role to or above your own authority",
            ));
        }
        target.level = level;
    }
    if let Some(permissions) = payload.permissions {
        // Identical sets are a no-op even on locked roles
        if permissions != target.permissions {
            if !target.permissions_editable() {
                return Err(AppError::new(ErrorCode::RolePermissionsLocked));
            }
            validate_delegation(&actor, &permissions)?;
            target.permissions = permissions;
        }
    }
    if let Some(color) = payload.color {
        target.color = Some(color);
    }

    let updated = role::update(&state.pool, &target).await?;
    tracing::info!(actor_id = actor.id, role_id = id, "Role updated");
    Ok(Json(updated))
}

/// DELETE /api/roles/{id} - Delete a custom role
///
/// Refused while users still hold the role; unbind them first.
pub async fn delete(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let target = role::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;

    if !target.kind.can_delete() {
        security_log!(WARN, "protected_role_delete_blocked", actor_id = actor.id, role_id = id);
        return Err(AppError::with_message(
            ErrorCode::SystemRoleProtected,
            "Built-in roles cannot be deleted",
        ));
    }
    if !evaluator::outranks(&actor, target.level) {
        return Err(AppError::with_message(
            ErrorCode::AuthorityTooLow,
            "Cannot delete a role at or above your own authority",
        ));
    }

    let bound = role::count_bound_users(&state.pool, id).await?;
    if bound > 0 {
        return Err(AppError::conflict(format!(
            "Role is still bound to {bound} user(s)"
        )));
    }

    let result = role::delete(&state.pool, id).await?;
    security_log!(INFO, "role_deleted", actor_id = actor.id, role_id = id, name = %target.name);
    Ok(Json(result))
}
