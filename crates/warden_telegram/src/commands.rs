//! Owner command front end.
//!
//! Chat commands edit the guard's watch lists through the config store and
//! report on its state. Viewing needs administrator or creator status in the
//! chat the command was sent from; editing needs creator status.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use warden_core::{ChannelId, MemberStatus, UserId, UserRef};
use warden_error::StoreResult;
use warden_guard::{
    AdminListing, AuditAction, AuditEntry, AuditLog, LOG_LISTING_LIMIT, MembershipApi, Messages,
};
use warden_store::ConfigStore;

/// Who may run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any user
    Anyone,
    /// Creator or administrator of the chat
    Admin,
    /// Creator of the chat
    Creator,
}

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Command {
    /// `/start`
    #[display("/start")]
    Start,
    /// `/help`
    #[display("/help")]
    Help,
    /// `/status`
    #[display("/status")]
    Status,
    /// `/config`
    #[display("/config")]
    Config,
    /// `/logs`
    #[display("/logs")]
    Logs,
    /// `/list_admins`
    #[display("/list_admins")]
    ListAdmins,
    /// `/add_channel`
    #[display("/add_channel")]
    AddChannel,
    /// `/remove_channel`
    #[display("/remove_channel")]
    RemoveChannel,
    /// `/add_admin <user id>`
    #[display("/add_admin")]
    AddAdmin(Option<String>),
    /// `/remove_admin <user id>`
    #[display("/remove_admin")]
    RemoveAdmin(Option<String>),
    /// `/autoban on|off`
    #[display("/autoban")]
    AutoBan(Option<String>),
    /// `/notifications on|off`
    #[display("/notifications")]
    Notifications(Option<String>),
    /// Any other command
    #[display("/{_0}")]
    Unknown(String),
}

impl Command {
    /// Parse a message text.
    ///
    /// Returns `None` for plain text and for commands addressed to another
    /// bot (`/cmd@other_bot`).
    ///
    /// # Examples
    ///
    /// ```
    /// use warden_telegram::Command;
    ///
    /// assert_eq!(
    ///     Command::parse("/add_admin@warden_bot 555", Some("warden_bot")),
    ///     Some(Command::AddAdmin(Some("555".to_string())))
    /// );
    /// assert_eq!(Command::parse("/status@other_bot", Some("warden_bot")), None);
    /// assert_eq!(Command::parse("hello", None), None);
    /// ```
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;
        let (head, rest) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body, ""));
        let (name, mention) = match head.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (head, None),
        };
        if let (Some(mention), Some(bot)) = (mention, bot_username) {
            if !mention.eq_ignore_ascii_case(bot) {
                return None;
            }
        }
        let arg = rest.split_whitespace().next().map(str::to_string);

        let command = match name.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "status" => Self::Status,
            "config" => Self::Config,
            "logs" => Self::Logs,
            "list_admins" => Self::ListAdmins,
            "add_channel" => Self::AddChannel,
            "remove_channel" => Self::RemoveChannel,
            "add_admin" => Self::AddAdmin(arg),
            "remove_admin" => Self::RemoveAdmin(arg),
            "autoban" => Self::AutoBan(arg),
            "notifications" => Self::Notifications(arg),
            _ => Self::Unknown(name.to_string()),
        };
        Some(command)
    }

    /// Who may run this command.
    pub fn access(&self) -> Access {
        match self {
            Self::Start | Self::Help | Self::Unknown(_) => Access::Anyone,
            Self::Status | Self::Config | Self::Logs | Self::ListAdmins => Access::Admin,
            Self::AddChannel
            | Self::RemoveChannel
            | Self::AddAdmin(_)
            | Self::RemoveAdmin(_)
            | Self::AutoBan(_)
            | Self::Notifications(_) => Access::Creator,
        }
    }
}

/// Parse an `on|off` argument.
pub fn parse_switch(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "true" | "enable" | "yes" => Some(true),
        "off" | "false" | "disable" | "no" => Some(false),
        _ => None,
    }
}

enum Applied {
    Changed,
    Unchanged,
    NotSaved,
}

/// Executes commands against the config store.
pub struct CommandHandler {
    store: Arc<dyn ConfigStore>,
    membership: Arc<dyn MembershipApi>,
    audit: Arc<dyn AuditLog>,
    messages: Messages,
    api_calls_per_minute: u32,
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("api_calls_per_minute", &self.api_calls_per_minute)
            .finish_non_exhaustive()
    }
}

impl CommandHandler {
    /// Handler over the given collaborators.
    pub fn new(
        store: Arc<dyn ConfigStore>,
        membership: Arc<dyn MembershipApi>,
        audit: Arc<dyn AuditLog>,
        api_calls_per_minute: u32,
    ) -> Self {
        Self {
            store,
            membership,
            audit,
            messages: Messages,
            api_calls_per_minute,
        }
    }

    /// Run `command` sent by `sender` in `chat` and return the reply.
    #[instrument(skip(self, sender), fields(chat_id = %chat, sender_id = %sender.id, command = %command))]
    pub async fn handle(&self, chat: ChannelId, sender: &UserRef, command: &Command) -> String {
        if let Err(reply) = self.authorize(chat, sender, command.access()).await {
            return reply;
        }

        match command {
            Command::Start => self.messages.welcome(),
            Command::Help => self.messages.help(),
            Command::Status => self.messages.status(&self.store.snapshot(), Utc::now()),
            Command::Config => self
                .messages
                .config_summary(&self.store.snapshot(), self.api_calls_per_minute),
            Command::Logs => self.logs().await,
            Command::ListAdmins => self.list_admins(chat).await,
            Command::AddChannel => self.add_channel(chat, sender).await,
            Command::RemoveChannel => self.remove_channel(chat, sender).await,
            Command::AddAdmin(arg) => self.add_admin(chat, sender, arg.as_deref()).await,
            Command::RemoveAdmin(arg) => self.remove_admin(chat, sender, arg.as_deref()).await,
            Command::AutoBan(arg) => self.switch_auto_ban(chat, sender, arg.as_deref()).await,
            Command::Notifications(arg) => {
                self.switch_notifications(chat, sender, arg.as_deref()).await
            }
            Command::Unknown(_) => self.messages.unknown_command(),
        }
    }

    async fn authorize(&self, chat: ChannelId, sender: &UserRef, access: Access) -> Result<(), String> {
        if access == Access::Anyone {
            return Ok(());
        }
        let status = match self.membership.get_member_status(chat, sender.id).await {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Could not verify sender status");
                return Err(self.messages.unauthorized());
            }
        };
        match access {
            Access::Creator if status != MemberStatus::Creator => Err(self.messages.creator_only()),
            Access::Admin if !status.is_privileged() => Err(self.messages.unauthorized()),
            _ => Ok(()),
        }
    }

    /// Record a store mutation. The in-memory record already holds the
    /// change when saving fails, so the action is audited either way.
    async fn apply(&self, result: StoreResult<bool>, entry: AuditEntry) -> Applied {
        let applied = match result {
            Ok(true) => Applied::Changed,
            Ok(false) => return Applied::Unchanged,
            Err(e) => {
                error!(error = %e, "Change applied in memory but not saved");
                Applied::NotSaved
            }
        };
        if let Err(e) = self.audit.append(entry).await {
            warn!(error = %e, "Failed to audit command");
        }
        applied
    }

    fn reply(&self, applied: Applied, changed: String, unchanged: String) -> String {
        match applied {
            Applied::Changed => changed,
            Applied::Unchanged => unchanged,
            Applied::NotSaved => format!("{}\n{}", changed, self.messages.not_saved()),
        }
    }

    async fn logs(&self) -> String {
        match self.audit.recent(LOG_LISTING_LIMIT).await {
            Ok(entries) => self.messages.logs(&entries),
            Err(e) => {
                warn!(error = %e, "Failed to read audit log");
                self.messages.logs(&[])
            }
        }
    }

    async fn list_admins(&self, chat: ChannelId) -> String {
        let mut listing = Vec::new();
        for admin in self.store.snapshot().monitored_admins {
            let status = self.membership.get_member_status(chat, admin).await.ok();
            listing.push(AdminListing {
                user: UserRef::from(admin),
                status,
            });
        }
        self.messages.monitored_admins(&listing)
    }

    async fn add_channel(&self, chat: ChannelId, sender: &UserRef) -> String {
        let result = self.store.add_protected_channel(chat).await;
        let entry = AuditEntry::new(AuditAction::ChannelAddedToProtection)
            .chat(chat)
            .admin(sender);
        let applied = self.apply(result, entry).await;
        self.reply(
            applied,
            self.messages.channel_added(),
            self.messages.channel_already_protected(),
        )
    }

    async fn remove_channel(&self, chat: ChannelId, sender: &UserRef) -> String {
        let result = self.store.remove_protected_channel(chat).await;
        let entry = AuditEntry::new(AuditAction::ChannelRemovedFromProtection)
            .chat(chat)
            .admin(sender);
        let applied = self.apply(result, entry).await;
        self.reply(
            applied,
            self.messages.channel_removed(),
            self.messages.channel_not_protected(),
        )
    }

    fn target(&self, command: &str, arg: Option<&str>) -> Result<UserId, String> {
        let Some(arg) = arg else {
            return Err(self.messages.usage(command, "<user id>"));
        };
        arg.parse::<UserId>()
            .map_err(|_| self.messages.invalid_user_id())
    }

    async fn add_admin(&self, chat: ChannelId, sender: &UserRef, arg: Option<&str>) -> String {
        let target = match self.target("add_admin", arg) {
            Ok(target) => target,
            Err(reply) => return reply,
        };
        match self.membership.get_member_status(chat, target).await {
            Ok(MemberStatus::Administrator) => {}
            Ok(status) => {
                info!(user_id = %target, %status, "Refusing to monitor a non-administrator");
                return self.messages.admin_add_failed();
            }
            Err(e) => {
                warn!(error = %e, user_id = %target, "Could not look up candidate admin");
                return self.messages.admin_add_failed();
            }
        }

        let result = self.store.add_monitored_admin(target).await;
        let entry = AuditEntry::new(AuditAction::AdminAddedToMonitor)
            .user(&UserRef::from(target))
            .chat(chat)
            .admin(sender);
        let applied = self.apply(result, entry).await;

        let protect = self.store.add_protected_channel(chat).await;
        let protect_entry = AuditEntry::new(AuditAction::ChannelAddedToProtection)
            .chat(chat)
            .admin(sender);
        self.apply(protect, protect_entry).await;

        self.reply(
            applied,
            self.messages.admin_added(target),
            self.messages.admin_already_monitored(target),
        )
    }

    async fn remove_admin(&self, chat: ChannelId, sender: &UserRef, arg: Option<&str>) -> String {
        let target = match self.target("remove_admin", arg) {
            Ok(target) => target,
            Err(reply) => return reply,
        };
        let result = self.store.remove_monitored_admin(target).await;
        let entry = AuditEntry::new(AuditAction::AdminRemovedFromMonitor)
            .user(&UserRef::from(target))
            .chat(chat)
            .admin(sender);
        let applied = self.apply(result, entry).await;
        self.reply(
            applied,
            self.messages.admin_removed(target),
            self.messages.admin_not_monitored(),
        )
    }

    async fn switch_auto_ban(&self, chat: ChannelId, sender: &UserRef, arg: Option<&str>) -> String {
        let Some(enabled) = arg.and_then(parse_switch) else {
            return self.messages.usage("autoban", "on|off");
        };
        let result = self.store.set_auto_ban_enabled(enabled).await;
        let entry = AuditEntry::new(AuditAction::SettingsChanged)
            .chat(chat)
            .admin(sender)
            .reason(format!("auto_ban_enabled={}", enabled));
        let applied = self.apply(result, entry).await;
        let text = self.messages.flag_set("Auto-ban", enabled);
        self.reply(applied, text.clone(), text)
    }

    async fn switch_notifications(
        &self,
        chat: ChannelId,
        sender: &UserRef,
        arg: Option<&str>,
    ) -> String {
        let Some(enabled) = arg.and_then(parse_switch) else {
            return self.messages.usage("notifications", "on|off");
        };
        let result = self.store.set_notification_enabled(enabled).await;
        let entry = AuditEntry::new(AuditAction::SettingsChanged)
            .chat(chat)
            .admin(sender)
            .reason(format!("notification_enabled={}", enabled));
        let applied = self.apply(result, entry).await;
        let text = self.messages.flag_set("Notifications", enabled);
        self.reply(applied, text.clone(), text)
    }
}
