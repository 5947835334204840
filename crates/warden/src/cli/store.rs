//! Offline edits of the guard configuration.
//!
//! Edits go through the same store and audit log the running guard uses, so
//! the audit trail shows CLI changes next to chat commands.

use super::commands::StoreCommands;
use super::run::render_json;
use tracing::warn;
use warden::{
    AuditAction, AuditEntry, AuditLog, ConfigStore, JsonConfigStore, JsonlAuditLog, WardenResult,
    WardenSettings,
};

const CLI_REASON: &str = "via cli";

/// Handle guard configuration commands.
pub async fn handle_store_command(cmd: StoreCommands, settings: &WardenSettings) -> WardenResult<()> {
    let store = JsonConfigStore::open_file(&settings.storage.config_path).await?;
    let audit = JsonlAuditLog::new(&settings.storage.audit_log_path);

    let (changed, entry) = match cmd {
        StoreCommands::Show => {
            println!("{}", render_json(&store.snapshot(), true)?);
            return Ok(());
        }
        StoreCommands::AddChannel { channel } => (
            store.add_protected_channel(channel).await?,
            AuditEntry::new(AuditAction::ChannelAddedToProtection).chat(channel),
        ),
        StoreCommands::RemoveChannel { channel } => (
            store.remove_protected_channel(channel).await?,
            AuditEntry::new(AuditAction::ChannelRemovedFromProtection).chat(channel),
        ),
        StoreCommands::AddAdmin { user } => (
            store.add_monitored_admin(user).await?,
            AuditEntry::new(AuditAction::AdminAddedToMonitor).user(&user.into()),
        ),
        StoreCommands::RemoveAdmin { user } => (
            store.remove_monitored_admin(user).await?,
            AuditEntry::new(AuditAction::AdminRemovedFromMonitor).user(&user.into()),
        ),
        StoreCommands::AutoBan { state } => (
            store.set_auto_ban_enabled(state.enabled()).await?,
            AuditEntry::new(AuditAction::SettingsChanged)
                .reason(format!("auto_ban_enabled={}", state.enabled())),
        ),
        StoreCommands::Notifications { state } => (
            store.set_notification_enabled(state.enabled()).await?,
            AuditEntry::new(AuditAction::SettingsChanged)
                .reason(format!("notification_enabled={}", state.enabled())),
        ),
    };

    if !changed {
        println!("No change");
        return Ok(());
    }

    let action = entry.action;
    let entry = match entry.reason.clone() {
        Some(reason) => entry.reason(format!("{} {}", reason, CLI_REASON)),
        None => entry.reason(CLI_REASON),
    };
    if let Err(e) = audit.append(entry).await {
        warn!(error = %e, "Failed to audit configuration change");
    }
    println!("Updated: {}", action);
    Ok(())
}
