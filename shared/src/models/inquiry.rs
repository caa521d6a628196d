//! Inquiry Model (public Q&A)

use serde::{Deserialize, Serialize};

/// Inquiry lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum InquiryStatus {
    Open,
    Answered,
}

/// Inquiry entity
///
/// `author_id` goes NULL when the author account is deleted; the inquiry
/// itself stays visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Inquiry {
    pub id: i64,
    pub author_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub answer: Option<String>,
    pub answered_by: Option<i64>,
    pub status: InquiryStatus,
    pub created_at: i64,
    pub answered_at: Option<i64>,
}

/// Create inquiry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryCreate {
    pub title: String,
    pub content: String,
}

/// Answer inquiry payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryAnswer {
    pub answer: String,
}
