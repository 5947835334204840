//! The persisted guard record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use warden_core::{ChannelId, UserId};

/// Protected channels, monitored admins and feature flags.
///
/// Every field is optional on read; a missing or empty record yields the
/// documented default (empty sets, auto-ban and notifications on).
///
/// # Examples
///
/// ```
/// use warden_store::GuardConfig;
///
/// let config: GuardConfig = serde_json::from_str(r#"{"monitored_admins": [555]}"#).unwrap();
/// assert!(config.auto_ban_enabled);
/// assert!(config.notification_enabled);
/// assert!(config.protected_channels.is_empty());
/// assert_eq!(config.monitored_admins.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Channels under supervision
    #[serde(default)]
    pub protected_channels: BTreeSet<ChannelId>,
    /// Admins watched for abuse, across all protected channels
    #[serde(default)]
    pub monitored_admins: BTreeSet<UserId>,
    /// Master switch for remediation
    #[serde(default = "enabled")]
    pub auto_ban_enabled: bool,
    /// Post an alert to the channel after remediation
    #[serde(default = "enabled")]
    pub notification_enabled: bool,
}

fn enabled() -> bool {
    true
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            protected_channels: BTreeSet::new(),
            monitored_admins: BTreeSet::new(),
            auto_ban_enabled: true,
            notification_enabled: true,
        }
    }
}

impl GuardConfig {
    /// Whether the channel is under supervision.
    pub fn is_protected(&self, channel: ChannelId) -> bool {
        self.protected_channels.contains(&channel)
    }

    /// Whether the user is on the watch list.
    pub fn is_monitored(&self, user: UserId) -> bool {
        self.monitored_admins.contains(&user)
    }
}
