//! User-facing message templates.

use crate::{AuditAction, AuditEntry};
use chrono::{DateTime, Utc};
use warden_core::{MemberStatus, UserId, UserRef};
use warden_store::GuardConfig;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Number of entries shown by [`Messages::logs`].
pub const LOG_LISTING_LIMIT: usize = 10;

/// One line of the monitored-admin listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminListing {
    /// Monitored admin
    pub user: UserRef,
    /// Current status in the chat the listing was requested from, if known
    pub status: Option<MemberStatus>,
}

/// English message renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Messages;

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

impl Messages {
    /// Reply to `/start`.
    pub fn welcome(&self) -> String {
        "🛡️ Channel guard is running.\n\n\
         Monitored administrators who ban ordinary members are demoted and \
         banned automatically.\n\n\
         /help - list commands\n\
         /status - guard status\n\
         /logs - recent actions\n\
         /config - current settings\n\n\
         ⚠️ The bot needs the right to restrict and promote members."
            .to_string()
    }

    /// Reply to `/help`.
    pub fn help(&self) -> String {
        "📋 Commands\n\n\
         /start - introduction\n\
         /status - guard status\n\
         /logs - recent actions\n\
         /config - current settings\n\
         /list_admins - monitored administrators\n\n\
         Owner only:\n\
         /add_channel - protect this chat\n\
         /remove_channel - stop protecting this chat\n\
         /add_admin <user id> - monitor an administrator\n\
         /remove_admin <user id> - stop monitoring an administrator\n\
         /autoban on|off - switch automatic punishment\n\
         /notifications on|off - switch channel alerts"
            .to_string()
    }

    /// Alert posted after an admin was punished.
    pub fn admin_banned(&self, admin: &UserRef, subject: &UserRef, at: DateTime<Utc>) -> String {
        format!(
            "⚠️ Administrator removed\n\n\
             👤 Admin: {}\n\
             📝 Reason: banned member {}\n\
             🕐 Time: {}\n\n\
             The administrator was demoted and banned automatically for abusing their rights.",
            admin.label(),
            subject.label(),
            at.format(TIMESTAMP_FORMAT)
        )
    }

    /// Reply to `/status`.
    pub fn status(&self, config: &GuardConfig, at: DateTime<Utc>) -> String {
        format!(
            "✅ Guard active\n\n\
             • Protected channels: {}\n\
             • Monitored admins: {}\n\
             • Auto-ban: {}\n\n\
             🕐 {}",
            config.protected_channels.len(),
            config.monitored_admins.len(),
            on_off(config.auto_ban_enabled),
            at.format(TIMESTAMP_FORMAT)
        )
    }

    /// Reply to `/config`.
    pub fn config_summary(&self, config: &GuardConfig, api_calls_per_minute: u32) -> String {
        format!(
            "⚙️ Settings\n\n\
             🔄 Auto-ban: {}\n\
             📢 Notifications: {}\n\
             📊 API limit: {}/minute\n\n\
             📁 Protected channels: {}\n\
             👥 Monitored admins: {}",
            on_off(config.auto_ban_enabled),
            on_off(config.notification_enabled),
            api_calls_per_minute,
            config.protected_channels.len(),
            config.monitored_admins.len()
        )
    }

    /// Reply to `/list_admins`.
    pub fn monitored_admins(&self, admins: &[AdminListing]) -> String {
        if admins.is_empty() {
            return "📝 No administrators are monitored.".to_string();
        }
        let mut text = String::from("👥 Monitored administrators:\n\n");
        for admin in admins {
            let status = admin
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            text.push_str(&format!("• {} ({})\n", admin.user.label(), status));
        }
        text
    }

    /// Reply to `/logs`; shows the last [`LOG_LISTING_LIMIT`] entries.
    pub fn logs(&self, entries: &[AuditEntry]) -> String {
        if entries.is_empty() {
            return "No actions recorded yet.".to_string();
        }
        let start = entries.len().saturating_sub(LOG_LISTING_LIMIT);
        let mut text = String::from("📋 Recent actions:\n\n");
        for entry in &entries[start..] {
            text.push_str(&format!(
                "🕐 {} {}",
                entry.timestamp.format("%m-%d %H:%M"),
                self.action_label(entry.action)
            ));
            if let Some(user) = entry.user_id {
                text.push_str(&format!(" user {}", user));
            }
            if let Some(admin) = entry.admin_id {
                text.push_str(&format!(" by {}", admin));
            }
            text.push('\n');
        }
        text
    }

    /// Short description of an audit action.
    pub fn action_label(&self, action: AuditAction) -> &'static str {
        match action {
            AuditAction::MemberBanned => "member banned",
            AuditAction::AdminBannedForAbuse => "admin banned for abuse",
            AuditAction::AdminDemotedNotBanned => "admin demoted, ban failed",
            AuditAction::PunishmentFailed => "punishment failed",
            AuditAction::AdminAddedToMonitor => "admin monitored",
            AuditAction::AdminRemovedFromMonitor => "admin unmonitored",
            AuditAction::ChannelAddedToProtection => "channel protected",
            AuditAction::ChannelRemovedFromProtection => "channel unprotected",
            AuditAction::SettingsChanged => "settings changed",
            AuditAction::BotStarted => "bot started",
        }
    }

    /// Sender may not use the command.
    pub fn unauthorized(&self) -> String {
        "❌ You are not allowed to use this command.".to_string()
    }

    /// Command restricted to the chat creator.
    pub fn creator_only(&self) -> String {
        "❌ Only the channel owner can use this command.".to_string()
    }

    /// Usage line for a command taking an argument.
    pub fn usage(&self, command: &str, argument: &str) -> String {
        format!("📝 Usage: /{} {}", command, argument)
    }

    /// Argument was not a numeric user ID.
    pub fn invalid_user_id(&self) -> String {
        "❌ That is not a valid user ID.".to_string()
    }

    /// Admin put on the watch list.
    pub fn admin_added(&self, admin: UserId) -> String {
        format!("✅ Administrator {} is now monitored.", admin)
    }

    /// Admin was already on the watch list.
    pub fn admin_already_monitored(&self, admin: UserId) -> String {
        format!("ℹ️ Administrator {} is already monitored.", admin)
    }

    /// Target is not an administrator of the chat.
    pub fn admin_add_failed(&self) -> String {
        "❌ Could not add the administrator. Make sure they are an administrator of this chat."
            .to_string()
    }

    /// Admin taken off the watch list.
    pub fn admin_removed(&self, admin: UserId) -> String {
        format!("✅ Administrator {} is no longer monitored.", admin)
    }

    /// Admin was not on the watch list.
    pub fn admin_not_monitored(&self) -> String {
        "❌ That administrator is not monitored.".to_string()
    }

    /// Chat put under protection.
    pub fn channel_added(&self) -> String {
        "✅ This chat is now protected.".to_string()
    }

    /// Chat was already protected.
    pub fn channel_already_protected(&self) -> String {
        "ℹ️ This chat is already protected.".to_string()
    }

    /// Chat taken out of protection.
    pub fn channel_removed(&self) -> String {
        "✅ This chat is no longer protected.".to_string()
    }

    /// Chat was not protected.
    pub fn channel_not_protected(&self) -> String {
        "❌ This chat is not protected.".to_string()
    }

    /// A feature flag was set.
    pub fn flag_set(&self, name: &str, enabled: bool) -> String {
        format!("✅ {} {}.", name, on_off(enabled))
    }

    /// The change was applied but could not be saved.
    pub fn not_saved(&self) -> String {
        "⚠️ Change applied but not yet saved; it will be retried.".to_string()
    }

    /// Anything the bot does not understand.
    pub fn unknown_command(&self) -> String {
        "❓ Unknown command. Send /help for the list.".to_string()
    }
}
