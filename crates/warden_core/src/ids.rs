//! Identifier types for channels and users.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Platform identifier of a chat (channel or supergroup).
///
/// Telegram channel IDs are negative (`-100…`), so the inner value is signed.
///
/// # Examples
///
/// ```
/// use warden_core::ChannelId;
///
/// let id: ChannelId = "-100123".parse().unwrap();
/// assert_eq!(id, ChannelId(-100123));
/// assert_eq!(id.to_string(), "-100123");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct ChannelId(pub i64);

impl FromStr for ChannelId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// Platform identifier of a user account.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("{}", _0)]
pub struct UserId(pub i64);

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// A user as seen in an event: the ID plus the handle, when the platform sent one.
///
/// # Examples
///
/// ```
/// use warden_core::UserRef;
///
/// assert_eq!(UserRef::new(555).with_username("mallory").label(), "@mallory");
/// assert_eq!(UserRef::new(777).label(), "777");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    /// Account ID
    pub id: UserId,
    /// Public handle without the leading `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UserRef {
    /// Reference a user by raw ID only.
    pub fn new(id: i64) -> Self {
        Self {
            id: UserId(id),
            username: None,
        }
    }

    /// Attach a handle.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Human-readable label: `@handle` when known, otherwise the numeric ID.
    pub fn label(&self) -> String {
        match &self.username {
            Some(name) if !name.is_empty() => format!("@{}", name),
            _ => self.id.to_string(),
        }
    }
}

impl From<UserId> for UserRef {
    fn from(id: UserId) -> Self {
        Self { id, username: None }
    }
}
