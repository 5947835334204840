//! Admin-abuse detection and automatic remediation.
//!
//! Watches membership changes in protected channels and punishes a monitored
//! administrator who bans an ordinary member: the admin is demoted, banned,
//! taken off the watch list, and the channel is told about it.
//!
//! # Pipeline
//!
//! platform event → [`classify`] → (ban event) → [`RemediationEngine`] →
//! membership API calls + [`warden_store::ConfigStore`] mutation →
//! [`Notifier`] + [`AuditLog`]
//!
//! [`Guard`] wires the steps together and is what an ingestion loop calls.
//!
//! # Collaborators
//!
//! - [`MembershipApi`] - member lookups, demotion and bans on the chat platform
//! - [`Notifier`] - posts alerts back to the channel
//! - [`AuditLog`] - records every decision; [`JsonlAuditLog`] writes JSON lines
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_guard::{Guard, RemediationEngine};
//!
//! let engine = RemediationEngine::new(store.clone(), client.clone(), client, audit.clone());
//! let guard = Guard::new(engine, store, audit, BanPolicy::default());
//!
//! if let Some(outcome) = guard.handle_transition(&transition).await {
//!     println!("{:?}", outcome);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod classifier;
mod engine;
mod guard;
mod messages;
mod metrics;
mod platform;

pub use audit::{AuditAction, AuditEntry, AuditLog, JsonlAuditLog, MemoryAuditLog};
pub use classifier::{classify, is_ban_transition};
pub use engine::RemediationEngine;
pub use guard::Guard;
pub use messages::{AdminListing, LOG_LISTING_LIMIT, Messages};
pub use metrics::{GuardMetrics, MetricsSnapshot};
pub use platform::{MembershipApi, NoOpNotifier, Notifier};
