//! File storage handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use http::{StatusCode, header};
use serde::{Deserialize, Serialize};

use shared::models::{FileStatus, StoredFile, StoredFileCreate};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::file;
use crate::security_log;
use crate::services::{FileStore, SignedUrl};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Hard cap on a single upload, enforced against the declared size and
/// again against the body
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Registered file plus the signed URL its bytes go to
#[derive(Debug, Serialize)]
pub struct UploadTicket {
    pub file: StoredFile,
    pub upload: SignedUrl,
}

#[derive(Debug, Deserialize)]
pub struct SignatureParams {
    pub expires: i64,
    pub sig: String,
}

/// GET /api/files - All file records
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<StoredFile>>> {
    let files = file::find_all(&state.pool).await?;
    Ok(Json(files))
}

/// GET /api/files/{id} - One file record
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StoredFile>> {
    let found = file::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::FileNotFound))?;
    Ok(Json(found))
}

/// POST /api/files - Register a file and get a signed upload URL
pub async fn request_upload(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<StoredFileCreate>,
) -> AppResult<(StatusCode, Json<UploadTicket>)> {
    validate_required_text(&payload.file_name, "file_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.content_type, "content_type", MAX_NAME_LEN)?;
    if payload.size <= 0 || payload.size > MAX_UPLOAD_BYTES as i64 {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("Declared size must be between 1 and {MAX_UPLOAD_BYTES} bytes"),
        ));
    }

    let key = FileStore::new_key(&payload.file_name);
    let created = file::create(&state.pool, &payload, &key, Some(user.id)).await?;
    let upload = state.signer.sign_upload(created.id)?;

    tracing::info!(
        file_id = created.id,
        user_id = user.id,
        name = %created.file_name,
        "Upload URL issued"
    );
    Ok((
        StatusCode::CREATED,
        Json(UploadTicket {
            file: created,
            upload,
        }),
    ))
}

/// PUT /api/files/{id}/content - Receive bytes for a signed upload
///
/// Re-sending within the signature window overwrites the previous bytes;
/// a network retry of the same PUT must not fail.
pub async fn upload_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<SignatureParams>,
    body: Bytes,
) -> AppResult<Json<StoredFile>> {
    if let Err(e) = state.signer.verify_upload(id, params.expires, &params.sig) {
        security_log!(WARN, "upload_signature_rejected", file_id = id, reason = %e);
        return Err(e);
    }

    let found = file::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::FileNotFound))?;

    let size = body.len() as i64;
    if size > found.size {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("Body is {size} bytes, {} were declared", found.size),
        ));
    }

    state.files.write(&found.storage_key, &body).await?;
    file::mark_uploaded(&state.pool, id, size).await?;

    let stored = file::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::FileNotFound))?;

    tracing::info!(file_id = id, size, "Upload complete");
    Ok(Json(stored))
}

/// GET /api/files/{id}/content - Serve uploaded bytes
///
/// Public once uploaded; a pending record is a 409 since the URL will
/// work as soon as the bytes arrive.
pub async fn serve_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let found = file::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::FileNotFound))?;

    if found.status != FileStatus::Uploaded {
        return Err(AppError::new(ErrorCode::FileNotUploaded));
    }

    let bytes = state.files.read(&found.storage_key).await?;

    Ok((
        [
            (header::CONTENT_TYPE, found.content_type.clone()),
            (
                header::CACHE_CONTROL,
                "public, max-age=3600".to_string(),
            ),
        ],
        bytes,
    ))
}

/// DELETE /api/files/{id} - Remove a file and its bytes
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let found = file::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::FileNotFound))?;

    state.files.remove(&found.storage_key).await?;
    let result = file::delete(&state.pool, id).await?;

    tracing::info!(file_id = id, user_id = user.id, "File deleted");
    Ok(Json(result))
}
