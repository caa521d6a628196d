//! Utility modules
//!
//! - Error types re-exported from `shared::error`
//! - Password hashing helpers
//! - Input validation helpers
//! - Logging setup

pub mod logger;
pub mod password;
pub mod validation;

// Re-export error types so handlers can use `crate::utils::{AppError, AppResult}`
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
