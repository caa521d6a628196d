//! Data models
//!
//! Shared between reef-server and the admin frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are epoch
//! milliseconds.

pub mod business;
pub mod inquiry;
pub mod newsletter;
pub mod page;
pub mod role;
pub mod setting;
pub mod stored_file;
pub mod subscriber;
pub mod user;

// Re-exports
pub use business::*;
pub use inquiry::*;
pub use newsletter::*;
pub use page::*;
pub use role::*;
pub use setting::*;
pub use stored_file::*;
pub use subscriber::*;
pub use user::*;
