//! Service layer
//!
//! Infrastructure services behind swappable seams:
//! - [`RateLimiter`] request throttling for public routes
//! - [`Mailer`] outgoing mail
//! - [`RelayPublisher`] event fan-out
//! - [`UrlSigner`] / [`FileStore`] signed uploads and disk storage

pub mod mailer;
pub mod rate_limit;
pub mod relay;
pub mod storage;

pub use mailer::{LogMailer, Mailer, WebhookMailer};
pub use rate_limit::{AllowAll, MemoryRateLimiter, RateLimiter, rate_limit};
pub use relay::{LogRelay, RelayPublisher, WebhookRelay, publish_background};
pub use storage::{FileStore, SignedUrl, UrlSigner};
