//! Chat platform error types.
//!
//! Errors surfaced by the membership API and the notification channel. The
//! remediation engine decides per call site whether a kind is fatal.

use derive_getters::Getters;

/// Platform error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// Network or HTTP transport failure.
    #[display("Transport error: {_0}")]
    Transport(String),

    /// Bot token rejected.
    #[display("Invalid or expired bot token")]
    Unauthorized,

    /// Bot was kicked or blocked from the chat.
    #[display("Forbidden: {_0}")]
    Forbidden(String),

    /// Bot lacks the administrator rights required for the call.
    #[display("Insufficient rights: {_0}")]
    InsufficientRights(String),

    /// Target user is not a participant of the chat.
    #[display("Member not found: {_0}")]
    MemberNotFound(String),

    /// Target user is already banned from the chat.
    #[display("Already banned: {_0}")]
    AlreadyBanned(String),

    /// Flood control triggered.
    #[display("Rate limited: retry after {retry_after}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after: u64,
    },

    /// Request rejected for another reason.
    #[display("Bad request: {_0}")]
    BadRequest(String),

    /// Response body could not be understood.
    #[display("Invalid response: {_0}")]
    InvalidResponse(String),
}

impl PlatformErrorKind {
    /// True when the requested end state already holds.
    ///
    /// Banning someone who is already banned (or already gone) lands here.
    pub fn is_already_applied(&self) -> bool {
        matches!(self, Self::AlreadyBanned(_) | Self::MemberNotFound(_))
    }

    /// True for failures that may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::RateLimited { .. })
    }
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    kind: PlatformErrorKind,
    line: u32,
    file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use warden_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::Unauthorized);
    /// assert!(!err.kind().is_already_applied());
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
