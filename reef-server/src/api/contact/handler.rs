//! Contact form handler

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::core::AppState;
use crate::services::publish_background;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, validate_email_format, validate_required_text,
};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// POST /api/contact - Forward a visitor message to the site owner
///
/// The reply address goes into the mail body, not the envelope; the
/// mailer always sends from the configured address.
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> AppResult<Json<()>> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_email_format(&req.email)?;
    validate_required_text(&req.message, "message", MAX_TEXT_LEN)?;

    let subject = match req.subject.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => format!("[Contact] {s}"),
        _ => format!("[Contact] Message from {}", req.name),
    };
    let body = format!("From: {} <{}>\n\n{}", req.name, req.email, req.message);

    state
        .mailer
        .send(&state.config.admin_email, &subject, &body)
        .await?;

    publish_background(
        state.relay.clone(),
        "contact.received",
        serde_json::json!({ "name": req.name, "email": req.email }),
    );

    tracing::info!(from = %req.email, "Contact message forwarded");
    Ok(Json(()))
}
