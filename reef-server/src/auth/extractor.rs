//! Request extractors for the authenticated user
//!
//! Identity is resolved once per request by
//! [`auth_context`](super::middleware::auth_context); these extractors
//! only read the result out of the request extensions.

use axum::{extract::FromRequestParts, http::request::Parts};

use shared::error::{AppError, ErrorCode};

use crate::auth::evaluator::CurrentUser;

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated))
    }
}

/// The user if one is signed in, `None` otherwise. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(parts.extensions.get::<CurrentUser>().cloned()))
    }
}
