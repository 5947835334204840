//! Audit log error types.

/// Kinds of audit log errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AuditErrorKind {
    /// Log file could not be opened, read or written
    #[display("Audit log I/O failed: {}", _0)]
    Io(String),
    /// Entry could not be encoded
    #[display("Audit entry serialization failed: {}", _0)]
    Serialize(String),
}

/// Audit log error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Audit Error: {} at line {} in {}", kind, line, file)]
pub struct AuditError {
    /// The kind of error that occurred
    pub kind: AuditErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AuditError {
    /// Create a new audit error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AuditErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<std::io::Error> for AuditError {
    #[track_caller]
    fn from(e: std::io::Error) -> Self {
        Self::new(AuditErrorKind::Io(e.to_string()))
    }
}

/// Result type for audit log operations.
pub type AuditResult<T> = Result<T, AuditError>;
