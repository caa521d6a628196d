//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// JWT configuration
///
/// Access and refresh tokens are signed with separate secrets so a leaked
/// access secret cannot mint refresh tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for access tokens
    pub access_secret: String,
    /// Secret for refresh tokens
    pub refresh_secret: String,
    /// Access token lifetime (minutes)
    pub access_ttl_minutes: i64,
    /// Refresh token lifetime (days)
    pub refresh_ttl_days: i64,
    /// Rotate the refresh token when less than this many days remain
    pub rotate_within_days: i64,
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./data | Working directory (database, uploads, logs) |
/// | DATABASE_PATH | {WORK_DIR}/reef.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_ACCESS_SECRET | dev fallback | Access token secret (required in production) |
/// | JWT_REFRESH_SECRET | dev fallback | Refresh token secret (required in production) |
/// | ACCESS_TOKEN_TTL_MINUTES | 60 | Access token lifetime |
/// | REFRESH_TOKEN_TTL_DAYS | 30 | Refresh token lifetime |
/// | REFRESH_ROTATE_WITHIN_DAYS | 7 | Rotation window before refresh expiry |
/// | UPLOAD_SIGNING_SECRET | dev fallback | HMAC secret for signed upload URLs |
/// | PUBLIC_BASE_URL | http://localhost:3000 | Base URL used in signed upload URLs |
/// | CORS_ORIGIN | (any) | Allowed CORS origin |
/// | MAIL_WEBHOOK_URL | (none) | Mail relay endpoint; unset logs mail instead |
/// | MAIL_FROM | noreply@reef.local | Sender address |
/// | RELAY_WEBHOOK_URL | (none) | Pub/sub relay endpoint; unset logs events |
/// | ADMIN_EMAIL | admin@reef.local | Seeded admin account email |
/// | ADMIN_USERNAME | admin | Seeded admin account username |
/// | ADMIN_PASSWORD | dev fallback | Seeded admin password (required in production) |
/// | LOG_DIR | (none) | Enables daily-rolling file logs |
/// | RATE_LIMIT_MAX | 5 | Public form submissions per window per IP |
/// | RATE_LIMIT_WINDOW_SECS | 60 | Rate limit window |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database, uploaded files and logs
    pub work_dir: String,
    /// SQLite database file path
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Running environment: development | staging | production
    pub environment: String,
    /// JWT settings
    pub jwt: JwtConfig,
    /// HMAC secret for signed upload URLs
    pub upload_signing_secret: String,
    /// Base URL clients use to reach this server (signed URL prefix)
    pub public_base_url: String,
    /// Allowed CORS origin; None allows any
    pub cors_origin: Option<String>,
    /// Mail relay webhook; None falls back to log-only mail
    pub mail_webhook_url: Option<String>,
    /// Sender address for outgoing mail
    pub mail_from: String,
    /// Pub/sub relay webhook; None falls back to log-only events
    pub relay_webhook_url: Option<String>,
    /// Seeded admin account
    pub admin_email: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Log directory; None logs to stdout only
    pub log_dir: Option<String>,
    /// Public form rate limit: max requests per window per client
    pub rate_limit_max: u32,
    /// Public form rate limit window (seconds)
    pub rate_limit_window_secs: u64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| format!("{work_dir}/reef.db")),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig {
                access_secret: Self::require_secret("JWT_ACCESS_SECRET", &environment)?,
                refresh_secret: Self::require_secret("JWT_REFRESH_SECRET", &environment)?,
                access_ttl_minutes: std::env::var("ACCESS_TOKEN_TTL_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
                refresh_ttl_days: std::env::var("REFRESH_TOKEN_TTL_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
                rotate_within_days: std::env::var("REFRESH_ROTATE_WITHIN_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(7),
            },
            upload_signing_secret: Self::require_secret("UPLOAD_SIGNING_SECRET", &environment)?,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            mail_webhook_url: std::env::var("MAIL_WEBHOOK_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            mail_from: std::env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@reef.local".into()),
            relay_webhook_url: std::env::var("RELAY_WEBHOOK_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            admin_email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@reef.local".into()),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            rate_limit_max: std::env::var("RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            rate_limit_window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            environment,
            work_dir,
        })
    }

    /// Override the paths and port, keeping everything else from the
    /// environment. Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Result<Self, BoxError> {
        let mut config = Self::from_env()?;
        let work_dir = work_dir.into();
        config.database_path = format!("{work_dir}/reef.db");
        config.work_dir = work_dir;
        config.http_port = http_port;
        Ok(config)
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_dev_fallback() {
        let v = Config::require_secret("REEF_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(v, "dev-REEF_TEST_UNSET_SECRET-not-for-production");
    }

    #[test]
    fn test_require_secret_fails_in_production() {
        let err = Config::require_secret("REEF_TEST_UNSET_SECRET", "production");
        assert!(err.is_err());
    }
}
