//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits are applied
//! here before any persistence call.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: role names, page titles, business names, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Notes, descriptions, inquiry content, contact messages
pub const MAX_TEXT_LEN: usize = 5000;

/// Newsletter bodies (HTML)
pub const MAX_BODY_LEN: usize = 100_000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// URLs / slugs / file names
pub const MAX_URL_LEN: usize = 2048;

/// Page slugs
pub const MAX_SLUG_LEN: usize = 200;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Minimal structural email check (one '@', non-empty local and domain,
/// domain contains a dot). Full RFC parsing is deliberately out of scope.
pub fn validate_email_format(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::validation("email is not a valid address"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

/// Validate a password against length bounds (content rules are left to
/// the frontend; the server only guards storage limits).
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN} characters)"
        )));
    }
    Ok(())
}

/// Validate a page slug: lowercase alphanumerics and hyphens only.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    validate_required_text(slug, "slug", MAX_SLUG_LEN)?;
    let ok = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !ok || slug.starts_with('-') || slug.ends_with('-') {
        return Err(AppError::validation(
            "slug may only contain lowercase letters, digits and inner hyphens",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("hello", "name", 10).is_ok());
        assert!(validate_required_text("", "name", 10).is_err());
        assert!(validate_required_text("   ", "name", 10).is_err());
        assert!(validate_required_text("toolongvalue", "name", 5).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", 5).is_ok());
        assert!(validate_optional_text(&Some("ok".to_string()), "note", 5).is_ok());
        assert!(validate_optional_text(&Some("toolong".to_string()), "note", 5).is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_email_format("a@b.com").is_ok());
        assert!(validate_email_format("first.last@sub.domain.org").is_ok());
        assert!(validate_email_format("no-at-sign").is_err());
        assert!(validate_email_format("@missing-local.com").is_err());
        assert!(validate_email_format("missing-domain@").is_err());
        assert!(validate_email_format("dot-at-end@domain.").is_err());
        assert!(validate_email_format("no-dot@domain").is_err());
    }

    #[test]
    fn test_password_bounds() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }

    #[test]
    fn test_slug_rules() {
        assert!(validate_slug("about-us").is_ok());
        assert!(validate_slug("page2").is_ok());
        assert!(validate_slug("About-Us").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("with space").is_err());
    }
}
