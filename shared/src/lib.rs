//! Shared types for the Reef platform
//!
//! Common types used by the server and (via JSON) the admin frontend:
//! data models, the unified error system, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
