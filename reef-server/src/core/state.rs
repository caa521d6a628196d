use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    FileStore, LogMailer, LogRelay, Mailer, MemoryRateLimiter, RateLimiter, RelayPublisher,
    UrlSigner, WebhookMailer, WebhookRelay,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
///
/// Cloned per request by axum; every field is either `Clone`-cheap or
/// behind an `Arc`.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | pool | SqlitePool | Embedded database |
/// | tokens | Arc<TokenService> | Access/refresh token signing |
/// | rate_limiter | Arc<dyn RateLimiter> | Public form throttling |
/// | mailer | Arc<dyn Mailer> | Outgoing mail |
/// | relay | Arc<dyn RelayPublisher> | Event fan-out to external consumers |
/// | signer | UrlSigner | Signed upload/download URLs |
/// | files | FileStore | On-disk file storage |
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Token signing and verification
    pub tokens: Arc<TokenService>,
    /// Rate limiter for unauthenticated endpoints
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Mail delivery
    pub mailer: Arc<dyn Mailer>,
    /// Event relay
    pub relay: Arc<dyn RelayPublisher>,
    /// Signed URL issuing and verification
    pub signer: UrlSigner,
    /// Uploaded file storage
    pub files: FileStore,
}

impl AppState {
    /// Initialize application state
    ///
    /// Order matters:
    /// 1. work_dir structure (uploads directory)
    /// 2. database (open + migrate)
    /// 3. seed data (system role, guest role, admin account)
    /// 4. services
    pub async fn initialize(config: &Config) -> Result<Self, BoxError> {
        let uploads_dir = format!("{}/uploads", config.work_dir);
        std::fs::create_dir_all(&uploads_dir)?;

        let db = DbService::new(&config.database_path).await?;
        crate::db::seed::ensure_seed_data(&db.pool, config).await?;

        let mailer: Arc<dyn Mailer> = match &config.mail_webhook_url {
            Some(url) => Arc::new(WebhookMailer::new(url.clone(), config.mail_from.clone())),
            None => Arc::new(LogMailer),
        };
        let relay: Arc<dyn RelayPublisher> = match &config.relay_webhook_url {
            Some(url) => Arc::new(WebhookRelay::new(url.clone())),
            None => Arc::new(LogRelay),
        };

        Ok(Self {
            tokens: Arc::new(TokenService::new(&config.jwt)),
            rate_limiter: Arc::new(MemoryRateLimiter::new(
                config.rate_limit_max,
                config.rate_limit_window_secs,
            )),
            mailer,
            relay,
            signer: UrlSigner::new(&config.upload_signing_secret, &config.public_base_url),
            files: FileStore::new(uploads_dir),
            pool: db.pool,
            config: config.clone(),
        })
    }

    /// Spawn periodic background maintenance (rate limiter cleanup,
    /// expired session purge)
    pub fn start_background_tasks(&self) {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
            loop {
                interval.tick().await;
                rate_limiter.cleanup();
            }
        });

        let pool = self.pool.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match crate::db::repository::session::delete_expired(&pool).await {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!("Purged {n} expired refresh tokens"),
                    Err(e) => tracing::warn!("Failed to purge expired refresh tokens: {e}"),
                }
            }
        });
    }
}
