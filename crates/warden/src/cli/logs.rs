//! Audit log command handlers.

use super::commands::LogCommands;
use super::run::render_json;
use std::str::FromStr;
use warden::{
    AuditAction, AuditEntry, AuditLog, ConfigError, JsonlAuditLog, MAX_AUDIT_RETENTION_DAYS,
    UserId, WardenResult, WardenSettings,
};

/// Entries scanned when filtering by action.
const FILTER_WINDOW: usize = 1000;

/// Handle audit log commands.
pub async fn handle_logs_command(cmd: LogCommands, settings: &WardenSettings) -> WardenResult<()> {
    let audit = JsonlAuditLog::new(&settings.storage.audit_log_path);

    match cmd {
        LogCommands::Show {
            limit,
            action,
            admin,
        } => {
            let action = action
                .map(|name| {
                    AuditAction::from_str(&name)
                        .map_err(|_| ConfigError::new(format!("Unknown audit action '{}'", name)))
                })
                .transpose()?;
            for entry in select(&audit, limit, action, admin).await? {
                println!("{}", render_json(&entry, false)?);
            }
        }
        LogCommands::Prune { days } => {
            let days = days.unwrap_or(settings.storage.audit_retention_days);
            if !(1..=MAX_AUDIT_RETENTION_DAYS).contains(&days) {
                return Err(ConfigError::new(format!(
                    "Retention must be between 1 and {} days",
                    MAX_AUDIT_RETENTION_DAYS
                ))
                .into());
            }
            let removed = audit.prune_older_than(days).await?;
            println!("Removed {} entries older than {} days", removed, days);
        }
    }
    Ok(())
}

async fn select(
    audit: &JsonlAuditLog,
    limit: usize,
    action: Option<AuditAction>,
    admin: Option<UserId>,
) -> WardenResult<Vec<AuditEntry>> {
    let entries = match (action, admin) {
        (Some(action), _) => audit.by_action(action, FILTER_WINDOW).await?,
        (None, Some(admin)) => return Ok(audit.by_admin(admin, limit).await?),
        (None, None) => return Ok(audit.recent(limit).await?),
    };

    let mut entries: Vec<AuditEntry> = entries
        .into_iter()
        .filter(|entry| admin.is_none_or(|admin| entry.admin_id == Some(admin)))
        .collect();
    let skip = entries.len().saturating_sub(limit);
    Ok(entries.split_off(skip))
}
