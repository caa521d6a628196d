//! Newsletter Model

use serde::{Deserialize, Serialize};

/// Newsletter lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum NewsletterStatus {
    Draft,
    Sent,
}

/// Newsletter entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Newsletter {
    pub id: i64,
    pub subject: String,
    /// HTML body as authored in the admin UI
    pub body: String,
    pub status: NewsletterStatus,
    pub created_at: i64,
    pub sent_at: Option<i64>,
}

/// Create newsletter payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterCreate {
    pub subject: String,
    pub body: String,
}

/// Update newsletter payload (drafts only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterUpdate {
    pub subject: Option<String>,
    pub body: Option<String>,
}
