//! Page Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// CMS page entity
///
/// `content` is an opaque JSON document (block structure is owned by the
/// frontend editor). The slug is unique across all pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Page {
    pub id: i64,
    pub slug: String,
    pub title: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub content: Value,
    pub is_published: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCreate {
    pub slug: String,
    pub title: String,
    pub content: Value,
    #[serde(default)]
    pub is_published: bool,
}

/// Update page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageUpdate {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub content: Option<Value>,
    pub is_published: Option<bool>,
}
