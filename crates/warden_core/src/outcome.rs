//! Result of processing one ban event.

use crate::UserRef;
use serde::{Deserialize, Serialize};

/// Why a ban event led to no remediation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Automatic banning is switched off
    #[display("auto-ban disabled")]
    AutoBanDisabled,
    /// The chat is not under supervision
    #[display("channel not protected")]
    ChannelNotProtected,
    /// The acting admin is not on the watch list
    #[display("actor not monitored")]
    ActorNotMonitored,
    /// The banned user is an administrator or the creator
    #[display("subject is privileged")]
    SubjectPrivileged,
}

/// Outcome of one remediation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemediationOutcome {
    /// Preconditions not met; nothing was done.
    NoAction {
        /// First failed precondition
        reason: SkipReason,
    },
    /// The admin was demoted and deregistered.
    AdminPunished {
        /// Punished admin
        admin: UserRef,
        /// Member the admin banned
        subject: UserRef,
        /// Whether the ban after demotion succeeded
        banned: bool,
        /// Whether the deregistration reached durable storage
        persisted: bool,
    },
    /// Demotion failed; nothing else was attempted.
    PunishmentFailed {
        /// Admin that could not be demoted
        admin: UserRef,
        /// Member the admin banned
        subject: UserRef,
        /// Error reported by the platform
        reason: String,
    },
}

impl RemediationOutcome {
    /// Shorthand for a skipped event.
    pub fn skipped(reason: SkipReason) -> Self {
        Self::NoAction { reason }
    }

    /// True when nothing was done.
    pub fn is_no_action(&self) -> bool {
        matches!(self, Self::NoAction { .. })
    }

    /// True when the admin lost their rights.
    pub fn is_punished(&self) -> bool {
        matches!(self, Self::AdminPunished { .. })
    }
}
