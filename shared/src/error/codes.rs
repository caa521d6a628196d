//! Unified error codes for the Reef platform
//!
//! This module defines all error codes used across the server and admin frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: User errors
//! - 4xxx: Role errors
//! - 5xxx: Content errors (pages, settings, newsletters, businesses)
//! - 6xxx: Inquiry errors
//! - 7xxx: File errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Request rate limit exceeded
    TooManyRequests = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Refresh token unknown, revoked or unverifiable
    RefreshTokenRejected = 1005,
    /// Account is disabled
    AccountDisabled = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Actor's authority level is too low for the target
    AuthorityTooLow = 2002,
    /// Granted permissions exceed what the actor may delegate
    PermissionNotDelegable = 2003,

    // ==================== 3xxx: User ====================
    /// User not found
    UserNotFound = 3001,
    /// Email already registered
    EmailExists = 3002,
    /// Username already taken
    UsernameExists = 3003,
    /// Users holding a system role cannot be deleted
    SystemUserProtected = 3004,

    // ==================== 4xxx: Role ====================
    /// Role not found
    RoleNotFound = 4001,
    /// Role name already exists
    RoleNameExists = 4002,
    /// System roles cannot be modified or deleted
    SystemRoleProtected = 4003,
    /// Role permission set is locked against edits
    RolePermissionsLocked = 4004,
    /// Permission name is not part of the catalog
    InvalidPermission = 4005,

    // ==================== 5xxx: Content ====================
    /// Page not found
    PageNotFound = 5001,
    /// Page slug already exists
    SlugExists = 5002,
    /// Setting not found
    SettingNotFound = 5003,
    /// Newsletter not found
    NewsletterNotFound = 5004,
    /// Newsletter has already been sent
    NewsletterAlreadySent = 5005,
    /// Subscriber already exists
    SubscriberExists = 5006,
    /// Subscriber not found
    SubscriberNotFound = 5007,
    /// Related business not found
    BusinessNotFound = 5008,

    // ==================== 6xxx: Inquiry ====================
    /// Inquiry not found
    InquiryNotFound = 6001,
    /// Inquiry has already been answered
    InquiryAlreadyAnswered = 6002,

    // ==================== 7xxx: File ====================
    /// File not found
    FileNotFound = 7001,
    /// File exceeds size limit
    FileTooLarge = 7002,
    /// Upload signature is invalid
    SignatureInvalid = 7003,
    /// Upload signature has expired
    SignatureExpired = 7004,
    /// File record exists but content was never uploaded
    FileNotUploaded = 7005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// File storage error
    StorageError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::TooManyRequests => "Too many requests, please try again later",

            // Auth
            ErrorCode::NotAuthenticated => "Unauthorized",
            ErrorCode::InvalidCredentials => "Invalid email or password.",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::RefreshTokenRejected => "Refresh token was not recognized",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Forbidden: Insufficient permissions",
            ErrorCode::AuthorityTooLow => "Insufficient authority level",
            ErrorCode::PermissionNotDelegable => "Cannot grant permissions you do not hold",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::UsernameExists => "Username is already taken",
            ErrorCode::SystemUserProtected => "Users holding a system role cannot be deleted",

            // Role
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleNameExists => "Role name already exists",
            ErrorCode::SystemRoleProtected => "System roles cannot be modified",
            ErrorCode::RolePermissionsLocked => "Role permissions cannot be modified",
            ErrorCode::InvalidPermission => "Unknown permission name",

            // Content
            ErrorCode::PageNotFound => "Page not found",
            ErrorCode::SlugExists => "Page slug already exists",
            ErrorCode::SettingNotFound => "Setting not found",
            ErrorCode::NewsletterNotFound => "Newsletter not found",
            ErrorCode::NewsletterAlreadySent => "Newsletter has already been sent",
            ErrorCode::SubscriberExists => "Email is already subscribed",
            ErrorCode::SubscriberNotFound => "Subscriber not found",
            ErrorCode::BusinessNotFound => "Business not found",

            // Inquiry
            ErrorCode::InquiryNotFound => "Inquiry not found",
            ErrorCode::InquiryAlreadyAnswered => "Inquiry has already been answered",

            // File
            ErrorCode::FileNotFound => "File not found",
            ErrorCode::FileTooLarge => "File exceeds the maximum allowed size",
            ErrorCode::SignatureInvalid => "Upload signature is invalid",
            ErrorCode::SignatureExpired => "Upload signature has expired",
            ErrorCode::FileNotUploaded => "File content has not been uploaded",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "File storage operation failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::RefreshTokenRejected),
            1006 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AuthorityTooLow),
            2003 => Ok(ErrorCode::PermissionNotDelegable),

            // User
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailExists),
            3003 => Ok(ErrorCode::UsernameExists),
            3004 => Ok(ErrorCode::SystemUserProtected),

            // Role
            4001 => Ok(ErrorCode::RoleNotFound),
            4002 => Ok(ErrorCode::RoleNameExists),
            4003 => Ok(ErrorCode::SystemRoleProtected),
            4004 => Ok(ErrorCode::RolePermissionsLocked),
            4005 => Ok(ErrorCode::InvalidPermission),

            // Content
            5001 => Ok(ErrorCode::PageNotFound),
            5002 => Ok(ErrorCode::SlugExists),
            5003 => Ok(ErrorCode::SettingNotFound),
            5004 => Ok(ErrorCode::NewsletterNotFound),
            5005 => Ok(ErrorCode::NewsletterAlreadySent),
            5006 => Ok(ErrorCode::SubscriberExists),
            5007 => Ok(ErrorCode::SubscriberNotFound),
            5008 => Ok(ErrorCode::BusinessNotFound),

            // Inquiry
            6001 => Ok(ErrorCode::InquiryNotFound),
            6002 => Ok(ErrorCode::InquiryAlreadyAnswered),

            // File
            7001 => Ok(ErrorCode::FileNotFound),
            7002 => Ok(ErrorCode::FileTooLarge),
            7003 => Ok(ErrorCode::SignatureInvalid),
            7004 => Ok(ErrorCode::SignatureExpired),
            7005 => Ok(ErrorCode::FileNotUploaded),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::StorageError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
