//! Top-level error wrapper types.

use crate::{AuditError, ConfigError, PlatformError, StoreError};

/// Every error condition a warden component can report.
///
/// # Examples
///
/// ```
/// use warden_error::{ConfigError, WardenError};
///
/// let err: WardenError = ConfigError::new("bad bind address").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum WardenErrorKind {
    /// Settings error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Config store error
    #[from(StoreError)]
    Store(StoreError),
    /// Chat platform error
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Audit log error
    #[from(AuditError)]
    Audit(AuditError),
}

/// Warden error with kind discrimination.
///
/// # Examples
///
/// ```
/// use warden_error::{PlatformError, PlatformErrorKind, WardenErrorKind, WardenResult};
///
/// fn call() -> WardenResult<()> {
///     Err(PlatformError::new(PlatformErrorKind::Unauthorized))?
/// }
///
/// let err = call().unwrap_err();
/// assert!(matches!(err.kind(), WardenErrorKind::Platform(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Warden Error: {}", _0)]
pub struct WardenError(Box<WardenErrorKind>);

impl WardenError {
    /// Create a new error from a kind.
    pub fn new(kind: WardenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WardenErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to WardenErrorKind
impl<T> From<T> for WardenError
where
    T: Into<WardenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for warden operations.
pub type WardenResult<T> = std::result::Result<T, WardenError>;
