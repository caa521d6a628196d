//! Newsletter handlers
//!
//! A newsletter is editable while it is a draft and frozen once sent.
//! Sending walks the subscriber list through the configured mailer;
//! individual delivery failures are logged and skipped, they do not
//! abort the run.

use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use shared::models::{Newsletter, NewsletterCreate, NewsletterStatus, NewsletterUpdate, Subscriber};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::{newsletter, subscriber};
use crate::services::publish_background;
use crate::utils::validation::{
    MAX_BODY_LEN, MAX_NAME_LEN, validate_email_format, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SendReport {
    pub sent: usize,
    pub failed: usize,
}

/// GET /api/newsletters - All newsletters, newest first
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Newsletter>>> {
    let newsletters = newsletter::find_all(&state.pool).await?;
    Ok(Json(newsletters))
}

/// GET /api/newsletters/{id} - One newsletter
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Newsletter>> {
    let found = newsletter::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NewsletterNotFound))?;
    Ok(Json(found))
}

/// POST /api/newsletters - Create a draft
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<NewsletterCreate>,
) -> AppResult<(StatusCode, Json<Newsletter>)> {
    validate_required_text(&payload.subject, "subject", MAX_NAME_LEN)?;
    validate_required_text(&payload.body, "body", MAX_BODY_LEN)?;

    let created = newsletter::create(&state.pool, &payload).await?;
    tracing::info!(user_id = user.id, newsletter_id = created.id, "Newsletter drafted");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/newsletters/{id} - Edit a draft
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<NewsletterUpdate>,
) -> AppResult<Json<Newsletter>> {
    let mut target = newsletter::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NewsletterNotFound))?;

    if target.status != NewsletterStatus::Draft {
        return Err(AppError::new(ErrorCode::NewsletterAlreadySent));
    }

    if let Some(subject) = payload.subject {
        validate_required_text(&subject, "subject", MAX_NAME_LEN)?;
        target.subject = subject;
    }
    if let Some(body) = payload.body {
        validate_required_text(&body, "body", MAX_BODY_LEN)?;
        target.body = body;
    }

    let updated = newsletter::update(&state.pool, &target).await?;
    tracing::info!(user_id = user.id, newsletter_id = id, "Newsletter updated");
    Ok(Json(updated))
}

/// POST /api/newsletters/{id}/send - Send a draft to every subscriber
pub async fn send(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<SendReport>> {
    let target = newsletter::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NewsletterNotFound))?;

    if target.status != NewsletterStatus::Draft {
        return Err(AppError::new(ErrorCode::NewsletterAlreadySent));
    }

    let subscribers = subscriber::find_all(&state.pool).await?;
    let mut sent = 0usize;
    let mut failed = 0usize;
    for sub in &subscribers {
        match state
            .mailer
            .send(&sub.email, &target.subject, &target.body)
            .await
        {
            Ok(()) => sent += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(newsletter_id = id, to = %sub.email, "Delivery failed: {e}");
            }
        }
    }

    newsletter::mark_sent(&state.pool, id).await?;
    publish_background(
        state.relay.clone(),
        "newsletter.sent",
        serde_json::json!({ "id": id, "subject": target.subject, "recipients": sent }),
    );

    tracing::info!(
        user_id = user.id,
        newsletter_id = id,
        sent,
        failed,
        "Newsletter sent"
    );
    Ok(Json(SendReport { sent, failed }))
}

/// DELETE /api/newsletters/{id} - Delete a newsletter
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    newsletter::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NewsletterNotFound))?;

    let result = newsletter::delete(&state.pool, id).await?;
    tracing::info!(user_id = user.id, newsletter_id = id, "Newsletter deleted");
    Ok(Json(result))
}

/// GET /api/newsletters/subscribers - The subscriber list
pub async fn list_subscribers(State(state): State<AppState>) -> AppResult<Json<Vec<Subscriber>>> {
    let subscribers = subscriber::find_all(&state.pool).await?;
    Ok(Json(subscribers))
}

/// POST /api/newsletters/subscribe - Join the mailing list
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> AppResult<(StatusCode, Json<Subscriber>)> {
    validate_email_format(&req.email)?;

    if subscriber::find_by_email(&state.pool, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::SubscriberExists));
    }

    let created = subscriber::create(&state.pool, &req.email).await?;
    tracing::info!(subscriber_id = created.id, "Subscriber added");
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/newsletters/unsubscribe - Leave the mailing list
///
/// Unsubscribing an address that was never subscribed succeeds; there
/// is nothing useful to report to the caller.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> AppResult<Json<()>> {
    validate_email_format(&req.email)?;
    subscriber::delete_by_email(&state.pool, &req.email).await?;
    Ok(Json(()))
}
