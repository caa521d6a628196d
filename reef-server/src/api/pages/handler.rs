//! CMS page handlers
//!
//! Page content is an opaque JSON document owned by the frontend editor;
//! the server only guards the slug and the publish flag.

use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;

use shared::models::{Page, PageCreate, PageUpdate};

use crate::auth::{CurrentUser, OptionalUser};
use crate::core::AppState;
use crate::db::repository::page;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text, validate_slug};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Drafts are visible only to page editors
fn can_see_drafts(user: &Option<CurrentUser>) -> bool {
    user.as_ref().is_some_and(|u| u.has_permission("EDIT_PAGE"))
}

/// GET /api/pages - Published pages, or all of them for editors
pub async fn list(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Json<Vec<Page>>> {
    let pages = page::find_all(&state.pool, !can_see_drafts(&user)).await?;
    Ok(Json(pages))
}

/// GET /api/pages/{id} - One page by id
pub async fn get_by_id(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Page>> {
    let found = page::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.is_published || can_see_drafts(&user))
        .ok_or_else(|| AppError::new(ErrorCode::PageNotFound))?;
    Ok(Json(found))
}

/// GET /api/pages/slug/{slug} - One page by slug
///
/// An unpublished page looks exactly like a missing one to visitors.
pub async fn get_by_slug(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(slug): Path<String>,
) -> AppResult<Json<Page>> {
    let found = page::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|p| p.is_published || can_see_drafts(&user))
        .ok_or_else(|| AppError::new(ErrorCode::PageNotFound))?;
    Ok(Json(found))
}

/// POST /api/pages - Create a page
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PageCreate>,
) -> AppResult<(StatusCode, Json<Page>)> {
    validate_slug(&payload.slug)?;
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;

    if page::find_by_slug(&state.pool, &payload.slug)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::SlugExists));
    }

    let created = page::create(&state.pool, &payload).await?;
    tracing::info!(user_id = user.id, page_id = created.id, slug = %created.slug, "Page created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/pages/{id} - Update a page
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PageUpdate>,
) -> AppResult<Json<Page>> {
    let mut target = page::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PageNotFound))?;

    if let Some(slug) = payload.slug {
        validate_slug(&slug)?;
        if slug != target.slug && page::find_by_slug(&state.pool, &slug).await?.is_some() {
            return Err(AppError::new(ErrorCode::SlugExists));
        }
        target.slug = slug;
    }
    if let Some(title) = payload.title {
        validate_required_text(&title, "title", MAX_NAME_LEN)?;
        target.title = title;
    }
    if let Some(content) = payload.content {
        target.content = content;
    }
    if let Some(is_published) = payload.is_published {
        target.is_published = is_published;
    }

    let updated = page::update(&state.pool, &target).await?;
    tracing::info!(user_id = user.id, page_id = id, "Page updated");
    Ok(Json(updated))
}

/// DELETE /api/pages/{id} - Delete a page
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    page::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PageNotFound))?;

    let result = page::delete(&state.pool, id).await?;
    tracing::info!(user_id = user.id, page_id = id, "Page deleted");
    Ok(Json(result))
}
