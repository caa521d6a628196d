//! Stored File Model

use serde::{Deserialize, Serialize};

/// Upload state of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum FileStatus {
    /// Record created, signed URL issued, bytes not yet received
    Pending,
    /// Bytes received and persisted
    Uploaded,
}

/// Stored file metadata
///
/// The blob itself lives on disk under `storage_key`; the key is internal
/// and never serialized to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StoredFile {
    pub id: i64,
    pub file_name: String,
    pub content_type: String,
    pub size: i64,
    pub status: FileStatus,
    #[serde(skip_serializing, default)]
    pub storage_key: String,
    pub owner_id: Option<i64>,
    pub created_at: i64,
    pub uploaded_at: Option<i64>,
}

/// Request a signed upload URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFileCreate {
    pub file_name: String,
    pub content_type: String,
    /// Declared size in bytes, enforced again when bytes arrive
    pub size: i64,
}
