//! Authentication and authorization
//!
//! - [`TokenService`] access/refresh token signing
//! - [`CurrentUser`] the request's authenticated user with loaded roles
//! - [`auth_context`] optional identity resolution middleware
//! - [`require_auth`] / [`require_permissions`] route protection
//! - [`session`] refresh token lifecycle and rotation

pub mod evaluator;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod permissions;
pub mod session;

pub use evaluator::{CurrentUser, check_permission};
pub use extractor::OptionalUser;
pub use jwt::{Claims, IssuedToken, JwtError, TokenService};
pub use middleware::{auth_context, require_any_permission, require_auth, require_permissions};
