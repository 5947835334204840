//! Action audit log.
//!
//! Every decision the guard takes, and every change the front end makes to
//! the watch lists, is recorded as one [`AuditEntry`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};
use warden_core::{ChannelId, UserId, UserRef};
use warden_error::{AuditError, AuditErrorKind, AuditResult};

/// Scan window used by the filtered queries.
const SCAN_WINDOW: usize = 1000;

/// What happened.
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
pub enum AuditAction {
    /// A member was banned inside a protected channel
    MemberBanned,
    /// A monitored admin was demoted and banned
    AdminBannedForAbuse,
    /// A monitored admin was demoted but the ban failed
    AdminDemotedNotBanned,
    /// Demotion failed; the admin kept their rights
    PunishmentFailed,
    /// An admin was put on the watch list
    AdminAddedToMonitor,
    /// An admin was taken off the watch list
    AdminRemovedFromMonitor,
    /// A channel was put under protection
    ChannelAddedToProtection,
    /// A channel was taken out of protection
    ChannelRemovedFromProtection,
    /// A feature flag was switched
    SettingsChanged,
    /// The bot process started
    BotStarted,
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the action was recorded
    pub timestamp: DateTime<Utc>,
    /// What happened
    pub action: AuditAction,
    /// User the action was about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Handle of that user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Chat the action happened in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChannelId>,
    /// Admin who performed the action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<UserId>,
    /// Handle of that admin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_username: Option<String>,
    /// Free-form explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEntry {
    /// Entry for `action`, stamped now.
    pub fn new(action: AuditAction) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            user_id: None,
            username: None,
            chat_id: None,
            admin_id: None,
            admin_username: None,
            reason: None,
        }
    }

    /// Set the user the action was about.
    pub fn user(mut self, user: &UserRef) -> Self {
        self.user_id = Some(user.id);
        self.username = user.username.clone();
        self
    }

    /// Set the chat.
    pub fn chat(mut self, chat: ChannelId) -> Self {
        self.chat_id = Some(chat);
        self
    }

    /// Set the admin who acted.
    pub fn admin(mut self, admin: &UserRef) -> Self {
        self.admin_id = Some(admin.id);
        self.admin_username = admin.username.clone();
        self
    }

    /// Set the explanation.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Append-only record of guard decisions.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Record one entry.
    async fn append(&self, entry: AuditEntry) -> AuditResult<()>;

    /// The most recent `limit` entries, oldest first.
    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditEntry>>;
}

fn tail(mut entries: Vec<AuditEntry>, limit: usize) -> Vec<AuditEntry> {
    if entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }
    entries
}

/// Audit log kept as a JSON-lines file.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlAuditLog {
    /// Log writing to `path`; the file and its directory are created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> AuditResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn read_all(&self) -> AuditResult<Vec<AuditEntry>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Audit log not created yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut skipped = 0usize;
        let entries: Vec<AuditEntry> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(_) => {
                    skipped += 1;
                    None
                }
            })
            .collect();
        if skipped > 0 {
            warn!(skipped, "Skipped unreadable audit log lines");
        }
        Ok(entries)
    }

    /// Most recent `limit` entries with the given action.
    pub async fn by_action(
        &self,
        action: AuditAction,
        limit: usize,
    ) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.recent(SCAN_WINDOW).await?;
        let matching = entries.into_iter().filter(|e| e.action == action).collect();
        Ok(tail(matching, limit))
    }

    /// Most recent `limit` entries performed by `admin`.
    pub async fn by_admin(&self, admin: UserId, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.recent(SCAN_WINDOW).await?;
        let matching = entries
            .into_iter()
            .filter(|e| e.admin_id == Some(admin))
            .collect();
        Ok(tail(matching, limit))
    }

    /// Drop entries older than `days` days. Returns the number removed.
    ///
    /// A window reaching past the earliest representable time removes nothing.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn prune_older_than(&self, days: i64) -> AuditResult<usize> {
        let Some(cutoff) =
            Duration::try_days(days).and_then(|window| Utc::now().checked_sub_signed(window))
        else {
            debug!(days, "Retention window out of range, keeping every entry");
            return Ok(0);
        };
        let _guard = self.write_lock.lock().await;
        let entries = self.read_all().await?;
        let before = entries.len();
        let kept: Vec<AuditEntry> = entries
            .into_iter()
            .filter(|e| e.timestamp > cutoff)
            .collect();

        let mut body = String::new();
        for entry in &kept {
            let line = serde_json::to_string(entry)
                .map_err(|e| AuditError::new(AuditErrorKind::Serialize(e.to_string())))?;
            body.push_str(&line);
            body.push('\n');
        }

        self.ensure_parent().await?;
        let mut temp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "actions.jsonl".into());
        temp_name.push(".tmp");
        let temp = self.path.with_file_name(temp_name);
        tokio::fs::write(&temp, body).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        let removed = before - kept.len();
        info!(kept = kept.len(), removed, "Pruned audit log");
        Ok(removed)
    }
}

#[async_trait]
impl AuditLog for JsonlAuditLog {
    #[instrument(skip(self, entry), fields(action = %entry.action))]
    async fn append(&self, entry: AuditEntry) -> AuditResult<()> {
        let mut line = serde_json::to_string(&entry)
            .map_err(|e| AuditError::new(AuditErrorKind::Serialize(e.to_string())))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        self.ensure_parent().await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        debug!("Audit entry appended");
        Ok(())
    }

    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        Ok(tail(self.read_all().await?, limit))
    }
}

/// Audit log held in process memory.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry recorded so far.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    /// Actions recorded so far, in order.
    pub fn actions(&self) -> Vec<AuditAction> {
        self.entries.lock().iter().map(|e| e.action).collect()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, entry: AuditEntry) -> AuditResult<()> {
        self.entries.lock().push(entry);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> AuditResult<Vec<AuditEntry>> {
        Ok(tail(self.entries(), limit))
    }
}
