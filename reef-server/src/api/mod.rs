//! API route modules
//!
//! Each resource keeps its router in `mod.rs` and its handlers in
//! `handler.rs`. Route guards (authentication, permissions, rate
//! limits) are applied at the router level, so handlers can assume the
//! guard already passed.
//!
//! - [`auth`] - signup, login, token refresh, logout
//! - [`users`] - account administration and role binding
//! - [`roles`] - role management and the permission catalog
//! - [`pages`] - CMS pages
//! - [`settings`] - key-value site settings
//! - [`newsletters`] - newsletters and subscribers
//! - [`inquiries`] - public Q&A
//! - [`businesses`] - partner directory
//! - [`files`] - signed uploads and file serving
//! - [`contact`] - contact form relay
//! - [`health`] - liveness probe

pub mod auth;
pub mod businesses;
pub mod contact;
pub mod files;
pub mod health;
pub mod inquiries;
pub mod newsletters;
pub mod pages;
pub mod roles;
pub mod settings;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
