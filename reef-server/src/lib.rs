//! Reef Server - content management backend
//!
//! # Architecture
//!
//! The server exposes a JSON HTTP API with JWT session handling,
//! role-based access control and a small set of content resources:
//!
//! - **Auth** (`auth`): access/refresh token pairs, device-bound
//!   sessions, permission evaluation and route guards
//! - **Database** (`db`): embedded SQLite storage with migrations,
//!   repositories and seed data
//! - **HTTP API** (`api`): RESTful handlers for users, roles, pages,
//!   settings, newsletters, inquiries, businesses and files
//! - **Services** (`services`): mail delivery, webhook relay,
//!   rate limiting, file storage and URL signing
//!
//! # Module structure
//!
//! ```text
//! reef-server/src/
//! ├── core/          # Config, state, server lifecycle
//! ├── auth/          # JWT sessions, permissions, guards
//! ├── api/           # HTTP routes and handlers
//! ├── routes/        # Router assembly and tower layers
//! ├── services/      # Mailer, relay, rate limiter, file store
//! ├── utils/         # Errors, validation, password hashing, logging
//! └── db/            # Pool, migrations, repositories, seed data
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export common types
pub use crate::auth::{CurrentUser, TokenService};
pub use crate::core::{AppState, Config, Server};
pub use crate::utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

/// Security event logging with a dedicated `security` target.
///
/// Accepts tracing field syntax after the event name:
///
/// ```ignore
/// security_log!(WARN, "login_failed", email = %req.email, reason = "wrong password");
/// ```
#[macro_export]
macro_rules! security_log {
    (ERROR, $event:expr $(, $($field:tt)*)?) => {
        tracing::error!(target: "security", event = $event $(, $($field)*)?)
    };
    (WARN, $event:expr $(, $($field:tt)*)?) => {
        tracing::warn!(target: "security", event = $event $(, $($field)*)?)
    };
    (INFO, $event:expr $(, $($field:tt)*)?) => {
        tracing::info!(target: "security", event = $event $(, $($field)*)?)
    };
}
