//! Site settings handlers
//!
//! Settings are free-form JSON values under operator-chosen keys. The
//! server stores and returns them without interpreting the content.

use axum::Json;
use axum::extract::{Path, State};

use shared::models::{Setting, SettingUpsert};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::setting;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/settings - All settings
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Setting>>> {
    let settings = setting::find_all(&state.pool).await?;
    Ok(Json(settings))
}

/// GET /api/settings/{key} - One setting
pub async fn get_by_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<Setting>> {
    let found = setting::find_by_key(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SettingNotFound))?;
    Ok(Json(found))
}

/// PUT /api/settings/{key} - Create or replace a setting
pub async fn upsert(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(key): Path<String>,
    Json(payload): Json<SettingUpsert>,
) -> AppResult<Json<Setting>> {
    validate_required_text(&key, "key", MAX_NAME_LEN)?;

    let saved = setting::upsert(&state.pool, &key, &payload.value).await?;
    tracing::info!(user_id = user.id, key = %key, "Setting saved");
    Ok(Json(saved))
}

/// DELETE /api/settings/{key} - Remove a setting
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(key): Path<String>,
) -> AppResult<Json<bool>> {
    let result = setting::delete(&state.pool, &key).await?;
    if result {
        tracing::info!(user_id = user.id, key = %key, "Setting deleted");
    }
    Ok(Json(result))
}
