//! Related Business Model

use serde::{Deserialize, Serialize};

/// Related business entity (partner directory entries shown on the site)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    /// Reference to an uploaded logo file
    pub logo_file_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create business payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessCreate {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub logo_file_id: Option<i64>,
}

/// Update business payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub logo_file_id: Option<i64>,
}
