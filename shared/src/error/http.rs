//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::UserNotFound
            | Self::RoleNotFound
            | Self::PageNotFound
            | Self::SettingNotFound
            | Self::NewsletterNotFound
            | Self::SubscriberNotFound
            | Self::BusinessNotFound
            | Self::InquiryNotFound
            | Self::FileNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailExists
            | Self::UsernameExists
            | Self::RoleNameExists
            | Self::SlugExists
            | Self::NewsletterAlreadySent
            | Self::SubscriberExists
            | Self::InquiryAlreadyAnswered
            | Self::FileNotUploaded => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            // RefreshTokenRejected is 403 rather than 401: the caller presented a
            // syntactically plausible token that the server refuses to honor.
            Self::PermissionDenied
            | Self::AuthorityTooLow
            | Self::RefreshTokenRejected
            | Self::SystemUserProtected
            | Self::SystemRoleProtected
            | Self::RolePermissionsLocked
            | Self::SignatureInvalid
            | Self::SignatureExpired => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::InvalidCredentials.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::RefreshTokenRejected.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_permission_statuses() {
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::AuthorityTooLow.http_status(),
            StatusCode::FORBIDDEN
        );
        // Delegation violations are a validation-shaped 400, not 403
        assert_eq!(
            ErrorCode::PermissionNotDelegable.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_conflict_and_not_found() {
        assert_eq!(ErrorCode::SlugExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::EmailExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::PageNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_system_statuses() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
