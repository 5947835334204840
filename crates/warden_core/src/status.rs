//! Membership status and chat kind enumerations.

use serde::{Deserialize, Serialize};

/// A member's standing in a chat.
///
/// Closed set of platform statuses plus `Unknown` for anything the platform
/// adds later. Parsing never fails.
///
/// # Examples
///
/// ```
/// use warden_core::MemberStatus;
///
/// assert_eq!(MemberStatus::parse("kicked"), MemberStatus::Kicked);
/// assert_eq!(MemberStatus::parse("owner"), MemberStatus::Unknown);
/// assert_eq!(MemberStatus::Administrator.to_string(), "administrator");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MemberStatus {
    /// Owner of the chat
    Creator,
    /// Administrator with some set of rights
    Administrator,
    /// Ordinary member
    Member,
    /// Member with restrictions applied
    Restricted,
    /// Not a member any more, left voluntarily
    Left,
    /// Banned from the chat
    Kicked,
    /// Any status this crate does not recognize
    #[serde(other)]
    Unknown,
}

impl MemberStatus {
    /// Parse a platform status string, mapping anything unrecognized to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }

    /// Creator or administrator.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Creator | Self::Administrator)
    }
}

/// Kind of chat an event came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChatKind {
    /// One-to-one chat
    Private,
    /// Small group
    Group,
    /// Large group
    Supergroup,
    /// Broadcast channel
    Channel,
    /// Unrecognized chat type
    #[serde(other)]
    Unknown,
}

impl ChatKind {
    /// Parse a platform chat type string.
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }

    /// Broadcast channels and large groups are the only supervised kinds.
    pub fn is_supervised(self) -> bool {
        matches!(self, Self::Channel | Self::Supergroup)
    }
}
