//! Warden - admin-abuse guard for Telegram channels.
//!
//! Warden watches membership changes in the channels it protects. When a
//! monitored administrator bans an ordinary member, warden strips the
//! admin's rights, bans them, takes them off the watch list and tells the
//! channel what happened.
//!
//! This crate is the facade: it layers the [`WardenSettings`], serves the
//! health endpoint and runs the [`WardenServer`]. The moving parts live in
//! the re-exported workspace crates.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use warden::{WardenServer, WardenSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let settings = WardenSettings::load(None)?;
//!     WardenServer::new(settings).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `otel` - export tracing spans through OpenTelemetry

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod server;
mod settings;

pub use api::{ApiState, StatusReport, create_router};
pub use server::WardenServer;
pub use settings::{
    DEFAULT_SETTINGS, HealthSettings, MAX_AUDIT_RETENTION_DAYS, StorageSettings, TelegramSettings, WardenSettings,
};

// Re-export the workspace crates
pub use warden_core::*;
pub use warden_error::*;
pub use warden_guard::*;
pub use warden_store::*;
pub use warden_telegram::*;
