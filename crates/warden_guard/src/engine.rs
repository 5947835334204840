//! Abuse remediation engine.

use crate::{AuditAction, AuditEntry, AuditLog, GuardMetrics, MembershipApi, Messages, Notifier};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use warden_core::{BanEvent, RemediationOutcome, SkipReason};
use warden_store::ConfigStore;

/// Punishes monitored admins who ban ordinary members.
///
/// For a ban event that passes every precondition the engine demotes the
/// admin, bans them, takes them off the watch list, alerts the channel and
/// records the action. Only a failed demotion stops the sequence; later
/// steps degrade the outcome but never undo earlier ones.
pub struct RemediationEngine {
    store: Arc<dyn ConfigStore>,
    membership: Arc<dyn MembershipApi>,
    notifier: Arc<dyn Notifier>,
    audit: Arc<dyn AuditLog>,
    messages: Messages,
    metrics: GuardMetrics,
}

impl std::fmt::Debug for RemediationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemediationEngine")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl RemediationEngine {
    /// Engine over the given collaborators.
    pub fn new(
        store: Arc<dyn ConfigStore>,
        membership: Arc<dyn MembershipApi>,
        notifier: Arc<dyn Notifier>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            store,
            membership,
            notifier,
            audit,
            messages: Messages,
            metrics: GuardMetrics::new(),
        }
    }

    /// Record into an existing metrics collector.
    pub fn with_metrics(mut self, metrics: GuardMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Metrics this engine records into.
    pub fn metrics(&self) -> &GuardMetrics {
        &self.metrics
    }

    /// First precondition the event fails, if any.
    async fn first_failed_precondition(&self, event: &BanEvent) -> Option<SkipReason> {
        if !self.store.auto_ban_enabled() {
            return Some(SkipReason::AutoBanDisabled);
        }
        if !self.store.is_protected(event.channel_id) {
            return Some(SkipReason::ChannelNotProtected);
        }
        if !self.store.is_monitored(event.actor.id) {
            return Some(SkipReason::ActorNotMonitored);
        }
        match self
            .membership
            .get_member_status(event.channel_id, event.subject.id)
            .await
        {
            Ok(status) if status.is_privileged() => Some(SkipReason::SubjectPrivileged),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Subject status lookup failed, remediating anyway");
                None
            }
        }
    }

    /// Process one ban event.
    #[instrument(
        skip(self, event),
        fields(
            channel_id = %event.channel_id,
            admin_id = %event.actor.id,
            subject_id = %event.subject.id
        )
    )]
    pub async fn remediate(&self, event: &BanEvent) -> RemediationOutcome {
        if let Some(reason) = self.first_failed_precondition(event).await {
            debug!(%reason, "Ban event needs no remediation");
            return RemediationOutcome::skipped(reason);
        }

        let channel = event.channel_id;
        let admin = &event.actor;
        let subject = &event.subject;

        if let Err(e) = self.membership.demote(channel, admin.id).await {
            error!(error = %e, "Failed to demote abusive admin; leaving them monitored");
            self.metrics.record_punishment_failure();
            let reason = e.kind().to_string();
            self.record(
                AuditEntry::new(AuditAction::PunishmentFailed)
                    .user(subject)
                    .chat(channel)
                    .admin(admin)
                    .reason(format!("Demotion failed: {}", reason)),
            )
            .await;
            return RemediationOutcome::PunishmentFailed {
                admin: admin.clone(),
                subject: subject.clone(),
                reason,
            };
        }

        let banned = match self.membership.ban(channel, admin.id).await {
            Ok(()) => true,
            Err(e) if e.kind().is_already_applied() => {
                debug!(error = %e, "Admin already banned");
                true
            }
            Err(e) => {
                warn!(error = %e, "Admin demoted but not banned");
                false
            }
        };

        let persisted = match self.store.remove_monitored_admin(admin.id).await {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Deregistration not persisted; store left dirty");
                self.metrics.record_persistence_failure();
                false
            }
        };

        if self.store.notification_enabled() {
            let text = self.messages.admin_banned(admin, subject, Utc::now());
            if let Err(e) = self.notifier.send(channel, &text).await {
                warn!(error = %e, "Failed to send abuse notification");
                self.metrics.record_notification_failure();
            }
        }

        let action = if banned {
            AuditAction::AdminBannedForAbuse
        } else {
            AuditAction::AdminDemotedNotBanned
        };
        self.record(
            AuditEntry::new(action)
                .user(subject)
                .chat(channel)
                .admin(admin)
                .reason(format!("Banned regular member {}", subject.id)),
        )
        .await;

        self.metrics.record_punishment(banned);
        info!(banned, persisted, "Abusive admin punished");

        RemediationOutcome::AdminPunished {
            admin: admin.clone(),
            subject: subject.clone(),
            banned,
            persisted,
        }
    }

    async fn record(&self, entry: AuditEntry) {
        let action = entry.action;
        if let Err(e) = self.audit.append(entry).await {
            warn!(error = %e, %action, "Failed to write audit entry");
        }
    }
}
