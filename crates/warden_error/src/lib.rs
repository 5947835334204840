//! Error types for warden.
//!
//! This crate provides the foundation error types used throughout the warden workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use warden_error::{StoreError, StoreErrorKind, WardenResult};
//!
//! fn persist() -> WardenResult<()> {
//!     Err(StoreError::new(StoreErrorKind::Persist("disk full".to_string())))?
//! }
//!
//! match persist() {
//!     Ok(()) => println!("saved"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod config;
mod error;
mod platform;
mod store;

pub use audit::{AuditError, AuditErrorKind, AuditResult};
pub use config::ConfigError;
pub use error::{WardenError, WardenErrorKind, WardenResult};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use store::{StoreError, StoreErrorKind, StoreResult};
