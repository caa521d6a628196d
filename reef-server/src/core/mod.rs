//! Core module: configuration, shared state and server lifecycle
//!
//! - [`Config`] server configuration
//! - [`AppState`] shared application state
//! - [`Server`] HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::AppState;
