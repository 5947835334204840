//! Membership transitions and ban events.

use crate::{ChannelId, ChatKind, MemberStatus, UserRef};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// One membership change reported by the platform.
///
/// # Examples
///
/// ```
/// use warden_core::{ChannelId, MemberStatus, MembershipTransitionBuilder, UserRef};
///
/// let transition = MembershipTransitionBuilder::default()
///     .channel_id(ChannelId(-100123))
///     .subject(UserRef::new(777))
///     .old_status(MemberStatus::Member)
///     .new_status(MemberStatus::Kicked)
///     .actor(UserRef::new(555))
///     .build()
///     .unwrap();
///
/// assert_eq!(transition.actor.map(|a| a.id.0), Some(555));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct MembershipTransition {
    /// Chat the change happened in
    pub channel_id: ChannelId,
    /// Kind of that chat
    #[builder(default = "ChatKind::Channel")]
    pub chat_kind: ChatKind,
    /// User whose membership changed
    pub subject: UserRef,
    /// Status before the change
    pub old_status: MemberStatus,
    /// Status after the change
    pub new_status: MemberStatus,
    /// Who made the change; `None` when it cannot be attributed
    #[builder(default, setter(strip_option))]
    pub actor: Option<UserRef>,
}

/// Which transitions into `kicked` count as a ban.
///
/// `member → kicked` and `restricted → kicked` always count. `left → kicked`
/// (banning someone who already left) counts only when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BanPolicy {
    /// Treat `left → kicked` as a ban
    #[serde(default)]
    pub count_left_as_ban: bool,
}

impl BanPolicy {
    /// Policy that also counts `left → kicked`.
    pub fn including_left() -> Self {
        Self {
            count_left_as_ban: true,
        }
    }
}

/// A transition classified as one user banning another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanEvent {
    /// Chat the ban happened in
    pub channel_id: ChannelId,
    /// Who issued the ban
    pub actor: UserRef,
    /// Who was banned
    pub subject: UserRef,
    /// Subject's status before the ban
    pub old_status: MemberStatus,
}
