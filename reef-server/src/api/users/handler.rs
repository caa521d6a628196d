//! User administration handlers
//!
//! Role binding enforces the authority ceiling: the actor's highest role
//! carrying BIND_ROLE or EDIT_ROLE sets the bar, and only roles strictly
//! below it may be newly bound. Bindings the target already holds are
//! exempt, so an administrator edit never strips roles granted earlier
//! by someone more senior.

use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;

use shared::models::{Role, UserCreate, UserUpdate, UserWithRoles};

use crate::auth::{CurrentUser, evaluator};
use crate::core::AppState;
use crate::db::repository::{role, user};
use crate::security_log;
use crate::utils::password::hash_password;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_URL_LEN, MAX_USERNAME_LEN, validate_email_format, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Drop repeated ids, keeping the first occurrence so binding order
/// stays as given
fn dedup_ids(ids: Vec<i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Every newly bound role must sit strictly below the actor's ceiling
fn check_bind_ceiling(actor: &CurrentUser, added: &[&Role]) -> Result<(), AppError> {
    for role in added {
        if !evaluator::outranks(actor, role.level) {
            security_log!(
                WARN,
                "role_bind_denied",
                actor_id = actor.id,
                role_id = role.id,
                role_level = role.level
            );
            return Err(AppError::with_message(
                ErrorCode::AuthorityTooLow,
                format!(
                    "Cannot bind role '{}': it is not below your own authority",
                    role.name
                ),
            ));
        }
    }
    Ok(())
}

/// GET /api/users - All users with their roles
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserWithRoles>>> {
    let users = user::find_all_with_roles(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/{id} - One user with roles
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserWithRoles>> {
    let found = user::find_with_roles(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(found))
}

/// POST /api/users - Create an account with an initial role set
///
/// Unlike signup, the caller picks the roles; the bind ceiling applies
/// to every one of them.
pub async fn create(
    State(state): State<AppState>,
    actor: CurrentUser,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<UserWithRoles>)> {
    validate_required_text(&payload.username, "username", MAX_USERNAME_LEN)?;
    validate_email_format(&payload.email)?;
    validate_password(&payload.password)?;
    validate_optional_text(&payload.display_name, "display_name", MAX_NAME_LEN)?;

    if user::find_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmailExists));
    }
    if user::find_by_username(&state.pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::UsernameExists));
    }

    let role_ids = dedup_ids(payload.role_ids.clone());
    let roles = role::find_by_ids(&state.pool, &role_ids).await?;
    if roles.len() != role_ids.len() {
        return Err(AppError::new(ErrorCode::RoleNotFound));
    }
    check_bind_ceiling(&actor, &roles.iter().collect::<Vec<_>>())?;

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    let created = user::create(
        &state.pool,
        &payload.username,
        &payload.email,
        &hash,
        payload.display_name.as_deref(),
    )
    .await?;

    if !role_ids.is_empty() {
        user::set_roles(&state.pool, created.id, &role_ids).await?;
    }

    let body = user::find_with_roles(&state.pool, created.id)
        .await?
        .ok_or_else(|| AppError::internal("User vanished after insert"))?;

    tracing::info!(
        actor_id = actor.id,
        user_id = created.id,
        username = %created.username,
        "User created"
    );

    Ok((StatusCode::CREATED, Json(body)))
}

/// PUT /api/users/{id} - Update profile fields
///
/// A password in the payload is an administrative reset: it is hashed,
/// stored and every session of the target is revoked. Deactivation also
/// revokes sessions so the account cannot refresh back in.
pub async fn update(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserWithRoles>> {
    let mut target = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if let Some(username) = payload.username {
        validate_required_text(&username, "username", MAX_USERNAME_LEN)?;
        if username != target.username
            && user::find_by_username(&state.pool, &username)
                .await?
                .is_some()
        {
            return Err(AppError::new(ErrorCode::UsernameExists));
        }
        target.username = username;
    }
    if let Some(email) = payload.email {
        validate_email_format(&email)?;
        if email != target.email && user::find_by_email(&state.pool, &email).await?.is_some() {
            return Err(AppError::new(ErrorCode::EmailExists));
        }
        target.email = email;
    }
    if let Some(display_name) = payload.display_name {
        validate_required_text(&display_name, "display_name", MAX_NAME_LEN)?;
        target.display_name = Some(display_name);
    }
    if let Some(avatar_url) = payload.avatar_url {
        validate_required_text(&avatar_url, "avatar_url", MAX_URL_LEN)?;
        target.avatar_url = Some(avatar_url);
    }
    if let Some(is_active) = payload.is_active {
        target.is_active = is_active;
    }

    let updated = user::update(&state.pool, &target).await?;

    if let Some(password) = payload.password {
        validate_password(&password)?;
        let hash = hash_password(&password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
        user::update_password(&state.pool, id, &hash).await?;
        crate::auth::session::revoke_user_sessions(&state.pool, id).await?;
        security_log!(WARN, "password_reset", actor_id = actor.id, user_id = id);
    } else if !updated.is_active {
        crate::auth::session::revoke_user_sessions(&state.pool, id).await?;
    }

    let body = user::find_with_roles(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    tracing::info!(actor_id = actor.id, user_id = id, "User updated");
    Ok(Json(body))
}

/// DELETE /api/users/{id} - Remove an account
///
/// Accounts holding a SYSTEM role can never be deleted, by anyone.
/// Otherwise the target's highest role must sit strictly below the
/// actor's own highest role.
pub async fn delete(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if user::has_system_role(&state.pool, id).await? {
        security_log!(WARN, "system_user_delete_blocked", actor_id = actor.id, user_id = id);
        return Err(AppError::new(ErrorCode::SystemUserProtected));
    }

    let bound = user::find_roles(&state.pool, id).await?;
    if let Some(top) = bound.iter().map(|r| r.level).max() {
        // A roleless actor outranks nobody
        let own = actor.highest_level().unwrap_or(i64::MIN);
        if top >= own {
            security_log!(
                WARN,
                "user_delete_denied",
                actor_id = actor.id,
                user_id = id,
                target_level = top
            );
            return Err(AppError::with_message(
                ErrorCode::AuthorityTooLow,
                "Cannot delete a user holding a role at or above your own authority",
            ));
        }
    }

    let result = user::delete(&state.pool, id).await?;
    security_log!(INFO, "user_deleted", actor_id = actor.id, user_id = id);
    Ok(Json(result))
}

/// PUT /api/users/{id}/roles - Replace the target's role bindings
///
/// The body is the full ordered list of role ids. Roles already bound
/// may be kept, reordered or dropped freely; additions go through the
/// ceiling check.
pub async fn set_roles(
    State(state): State<AppState>,
    actor: CurrentUser,
    Path(id): Path<i64>,
    Json(role_ids): Json<Vec<i64>>,
) -> AppResult<Json<UserWithRoles>> {
    user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let role_ids = dedup_ids(role_ids);
    let requested = role::find_by_ids(&state.pool, &role_ids).await?;
    if requested.len() != role_ids.len() {
        return Err(AppError::new(ErrorCode::RoleNotFound));
    }

    let current: HashSet<i64> = user::find_roles(&state.pool, id)
        .await?
        .iter()
        .map(|r| r.id)
        .collect();
    let added: Vec<&Role> = requested
        .iter()
        .filter(|r| !current.contains(&r.id))
        .collect();
    check_bind_ceiling(&actor, &added)?;

    user::set_roles(&state.pool, id, &role_ids).await?;

    let body = user::find_with_roles(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    tracing::info!(
        actor_id = actor.id,
        user_id = id,
        roles = ?role_ids,
        "Roles rebound"
    );
    Ok(Json(body))
}
