//! Core data types for the warden admin-abuse guard.
//!
//! This crate provides the vocabulary shared by every warden component:
//! identifiers, membership statuses, the transitions the platform reports,
//! and the outcome of a remediation attempt.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ids;
mod outcome;
mod status;
mod telemetry;
mod transition;

pub use ids::{ChannelId, UserId, UserRef};
pub use outcome::{RemediationOutcome, SkipReason};
pub use status::{ChatKind, MemberStatus};
pub use telemetry::{TelemetryConfig, init_telemetry, shutdown_telemetry};
pub use transition::{
    BanEvent, BanPolicy, MembershipTransition, MembershipTransitionBuilder,
    MembershipTransitionBuilderError,
};
