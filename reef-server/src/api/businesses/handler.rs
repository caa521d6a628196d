//! Partner directory handlers

use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;

use shared::models::{Business, BusinessCreate, BusinessUpdate};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::business;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/businesses - The directory, alphabetical
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Business>>> {
    let businesses = business::find_all(&state.pool).await?;
    Ok(Json(businesses))
}

/// GET /api/businesses/{id} - One entry
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Business>> {
    let found = business::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BusinessNotFound))?;
    Ok(Json(found))
}

/// POST /api/businesses - Add an entry
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<BusinessCreate>,
) -> AppResult<(StatusCode, Json<Business>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.url, "url", MAX_URL_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;

    let created = business::create(&state.pool, &payload).await?;
    tracing::info!(user_id = user.id, business_id = created.id, name = %created.name, "Business added");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/businesses/{id} - Update an entry
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BusinessUpdate>,
) -> AppResult<Json<Business>> {
    let mut target = business::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BusinessNotFound))?;

    if let Some(name) = payload.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        target.name = name;
    }
    if let Some(url) = payload.url {
        validate_required_text(&url, "url", MAX_URL_LEN)?;
        target.url = Some(url);
    }
    if let Some(description) = payload.description {
        validate_required_text(&description, "description", MAX_TEXT_LEN)?;
        target.description = Some(description);
    }
    if let Some(logo_file_id) = payload.logo_file_id {
        target.logo_file_id = Some(logo_file_id);
    }

    let updated = business::update(&state.pool, &target).await?;
    tracing::info!(user_id = user.id, business_id = id, "Business updated");
    Ok(Json(updated))
}

/// DELETE /api/businesses/{id} - Remove an entry
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    business::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BusinessNotFound))?;

    let result = business::delete(&state.pool, id).await?;
    tracing::info!(user_id = user.id, business_id = id, "Business removed");
    Ok(Json(result))
}
