//! Bot rights check.

use crate::TelegramClient;
use derive_getters::Getters;
use tracing::{instrument, warn};
use warden_core::{ChannelId, MemberStatus, UserId};
use warden_error::PlatformResult;

/// The bot's standing in one chat.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct BotPermissions {
    status: MemberStatus,
    can_restrict_members: bool,
    can_promote_members: bool,
}

impl BotPermissions {
    /// Names of the rights remediation needs but the bot lacks.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_core::MemberStatus;
    /// use warden_telegram::BotPermissions;
    ///
    /// let perms = BotPermissions::new(MemberStatus::Administrator, true, false);
    /// assert_eq!(perms.missing(), vec!["can_promote_members"]);
    /// ```
    pub fn missing(&self) -> Vec<&'static str> {
        if self.status == MemberStatus::Creator {
            return Vec::new();
        }
        let mut missing = Vec::new();
        if !self.can_restrict_members {
            missing.push("can_restrict_members");
        }
        if !self.can_promote_members {
            missing.push("can_promote_members");
        }
        missing
    }

    /// Whether the bot can demote and ban.
    pub fn sufficient(&self) -> bool {
        self.missing().is_empty()
    }

    /// Permissions from explicit values.
    pub fn new(status: MemberStatus, can_restrict_members: bool, can_promote_members: bool) -> Self {
        Self {
            status,
            can_restrict_members,
            can_promote_members,
        }
    }
}

/// Look up what the bot `bot_id` may do in `channel`.
///
/// # Errors
///
/// Returns error if the membership lookup fails.
#[instrument(skip(client), fields(channel_id = %channel))]
pub async fn check_bot_permissions(
    client: &TelegramClient,
    bot_id: UserId,
    channel: ChannelId,
) -> PlatformResult<BotPermissions> {
    let member = client.get_chat_member(channel, bot_id).await?;
    let permissions = BotPermissions::new(
        MemberStatus::parse(&member.status),
        member.can_restrict_members.unwrap_or(false),
        member.can_promote_members.unwrap_or(false),
    );
    let missing = permissions.missing();
    if !missing.is_empty() {
        warn!(?missing, "Bot lacks rights needed for remediation");
    }
    Ok(permissions)
}
