//! Per-event pipeline: classify, audit, remediate.

use crate::{AuditAction, AuditEntry, AuditLog, GuardMetrics, RemediationEngine, classify};
use std::sync::Arc;
use tracing::{instrument, warn};
use warden_core::{BanPolicy, MembershipTransition, RemediationOutcome};
use warden_store::ConfigStore;

/// Entry point for membership transitions.
///
/// Events are expected one at a time from a single ingestion loop.
pub struct Guard {
    engine: RemediationEngine,
    store: Arc<dyn ConfigStore>,
    audit: Arc<dyn AuditLog>,
    policy: BanPolicy,
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("engine", &self.engine)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Guard {
    /// Guard running `engine` against `store`, classifying with `policy`.
    pub fn new(
        engine: RemediationEngine,
        store: Arc<dyn ConfigStore>,
        audit: Arc<dyn AuditLog>,
        policy: BanPolicy,
    ) -> Self {
        Self {
            engine,
            store,
            audit,
            policy,
        }
    }

    /// Classification policy in use.
    pub fn policy(&self) -> BanPolicy {
        self.policy
    }

    /// Metrics shared with the engine.
    pub fn metrics(&self) -> &GuardMetrics {
        self.engine.metrics()
    }

    /// Handle one transition.
    ///
    /// Returns `None` when the transition is not an attributable ban,
    /// otherwise the engine's outcome.
    #[instrument(skip(self, transition), fields(channel_id = %transition.channel_id))]
    pub async fn handle_transition(
        &self,
        transition: &MembershipTransition,
    ) -> Option<RemediationOutcome> {
        let metrics = self.engine.metrics();
        metrics.record_transition();

        let event = classify(transition, self.policy)?;
        metrics.record_ban_event();

        if self.store.is_protected(event.channel_id) {
            let entry = AuditEntry::new(AuditAction::MemberBanned)
                .user(&event.subject)
                .chat(event.channel_id)
                .admin(&event.actor);
            if let Err(e) = self.audit.append(entry).await {
                warn!(error = %e, "Failed to audit member ban");
            }
        }

        let outcome = self.engine.remediate(&event).await;
        if outcome.is_no_action() {
            metrics.record_skipped();
        }
        Some(outcome)
    }
}
