//! Config store error types.

/// Kinds of config store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Failed to read the persisted record
    #[display("Failed to read config: {}", _0)]
    Read(String),
    /// Persisted record is not valid
    #[display("Failed to parse config: {}", _0)]
    Parse(String),
    /// Failed to serialize the in-memory record
    #[display("Failed to serialize config: {}", _0)]
    Serialize(String),
    /// Failed to write the record to its medium
    #[display("Failed to persist config: {}", _0)]
    Persist(String),
}

/// Config store error with location tracking.
///
/// # Examples
///
/// ```
/// use warden_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Persist("read-only filesystem".to_string()));
/// assert!(err.is_persist());
/// assert!(format!("{}", err).contains("persist"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the in-memory mutation succeeded but writing it out failed.
    pub fn is_persist(&self) -> bool {
        matches!(self.kind, StoreErrorKind::Persist(_))
    }
}

/// Result type for config store operations.
pub type StoreResult<T> = Result<T, StoreError>;
