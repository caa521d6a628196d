//! Newsletter Subscriber Model

use serde::{Deserialize, Serialize};

/// Newsletter subscriber (email only, no account required)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub created_at: i64,
}
