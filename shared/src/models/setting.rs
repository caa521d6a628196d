//! Setting Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key-value site setting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Setting {
    pub id: i64,
    pub key: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub value: Value,
    pub updated_at: i64,
}

/// Upsert setting payload (the key comes from the path)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingUpsert {
    pub value: Value,
}
