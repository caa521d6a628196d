//! Inquiry handlers
//!
//! An inquiry survives its author: deleting the account nulls the
//! author reference and keeps the thread.

use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;

use shared::models::{Inquiry, InquiryAnswer, InquiryCreate, InquiryStatus};

use crate::auth::{CurrentUser, OptionalUser};
use crate::core::AppState;
use crate::db::repository::inquiry;
use crate::services::publish_background;
use crate::utils::validation::{MAX_NAME_LEN, MAX_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/inquiry - Every inquiry, for reviewers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Inquiry>>> {
    let inquiries = inquiry::find_all(&state.pool).await?;
    Ok(Json(inquiries))
}

/// GET /api/inquiry/mine - The caller's own inquiries
pub async fn list_mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Inquiry>>> {
    let inquiries = inquiry::find_by_author(&state.pool, user.id).await?;
    Ok(Json(inquiries))
}

/// GET /api/inquiry/{id} - One inquiry
///
/// Visible to reviewers and to the author; everyone else gets a 403.
pub async fn get_by_id(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Inquiry>> {
    let found = inquiry::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InquiryNotFound))?;

    let allowed = user.as_ref().is_some_and(|u| {
        u.has_permission("VIEW_INQUIRIES") || found.author_id == Some(u.id)
    });
    if !allowed {
        return Err(AppError::new(ErrorCode::PermissionDenied));
    }

    Ok(Json(found))
}

/// POST /api/inquiry - Ask a question
///
/// Anonymous submissions are accepted; a signed-in author is recorded so
/// the inquiry shows up under /mine.
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(payload): Json<InquiryCreate>,
) -> AppResult<(StatusCode, Json<Inquiry>)> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_required_text(&payload.content, "content", MAX_TEXT_LEN)?;

    let author_id = user.as_ref().map(|u| u.id);
    let created = inquiry::create(&state.pool, author_id, &payload).await?;

    publish_background(
        state.relay.clone(),
        "inquiry.created",
        serde_json::json!({ "id": created.id, "title": created.title }),
    );

    tracing::info!(inquiry_id = created.id, author_id = ?author_id, "Inquiry submitted");
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/inquiry/{id}/answer - Answer an open inquiry
pub async fn answer(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<InquiryAnswer>,
) -> AppResult<Json<Inquiry>> {
    validate_required_text(&payload.answer, "answer", MAX_TEXT_LEN)?;

    let found = inquiry::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InquiryNotFound))?;

    if found.status != InquiryStatus::Open {
        return Err(AppError::new(ErrorCode::InquiryAlreadyAnswered));
    }

    let answered = inquiry::answer(&state.pool, id, user.id, &payload.answer).await?;

    publish_background(
        state.relay.clone(),
        "inquiry.answered",
        serde_json::json!({ "id": id }),
    );

    tracing::info!(inquiry_id = id, user_id = user.id, "Inquiry answered");
    Ok(Json(answered))
}

/// DELETE /api/inquiry/{id} - Remove an inquiry
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    inquiry::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InquiryNotFound))?;

    let result = inquiry::delete(&state.pool, id).await?;
    tracing::info!(inquiry_id = id, user_id = user.id, "Inquiry deleted");
    Ok(Json(result))
}
