//! Counters for the guard pipeline.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics collector shared between the guard, the engine and the health API.
///
/// Cloning is cheap; clones observe the same counters.
#[derive(Debug, Clone, Default)]
pub struct GuardMetrics {
    inner: Arc<GuardMetricsInner>,
}

#[derive(Debug, Default)]
struct GuardMetricsInner {
    transitions: AtomicU64,
    ban_events: AtomicU64,
    skipped: AtomicU64,
    punishments: AtomicU64,
    partial_punishments: AtomicU64,
    punishment_failures: AtomicU64,
    persistence_failures: AtomicU64,
    notification_failures: AtomicU64,
    last_punishment: Mutex<Option<Instant>>,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

impl GuardMetrics {
    /// Fresh collector with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A membership transition was seen.
    pub fn record_transition(&self) {
        bump(&self.inner.transitions);
    }

    /// A transition was classified as a ban event.
    pub fn record_ban_event(&self) {
        bump(&self.inner.ban_events);
    }

    /// A ban event failed a precondition.
    pub fn record_skipped(&self) {
        bump(&self.inner.skipped);
    }

    /// An admin was demoted; `banned` tells whether the ban followed.
    pub fn record_punishment(&self, banned: bool) {
        if banned {
            bump(&self.inner.punishments);
        } else {
            bump(&self.inner.partial_punishments);
        }
        *self.inner.last_punishment.lock() = Some(Instant::now());
    }

    /// Demotion failed.
    pub fn record_punishment_failure(&self) {
        bump(&self.inner.punishment_failures);
    }

    /// Deregistration could not be persisted.
    pub fn record_persistence_failure(&self) {
        bump(&self.inner.persistence_failures);
    }

    /// Channel alert could not be delivered.
    pub fn record_notification_failure(&self) {
        bump(&self.inner.notification_failures);
    }

    /// Time since the last punishment, if any.
    pub fn time_since_punishment(&self) -> Option<Duration> {
        self.inner.last_punishment.lock().map(|at| at.elapsed())
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        MetricsSnapshot {
            transitions: load(&self.inner.transitions),
            ban_events: load(&self.inner.ban_events),
            skipped: load(&self.inner.skipped),
            punishments: load(&self.inner.punishments),
            partial_punishments: load(&self.inner.partial_punishments),
            punishment_failures: load(&self.inner.punishment_failures),
            persistence_failures: load(&self.inner.persistence_failures),
            notification_failures: load(&self.inner.notification_failures),
            secs_since_punishment: self.time_since_punishment().map(|d| d.as_secs()),
        }
    }
}

/// Serializable view of [`GuardMetrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Membership transitions seen
    pub transitions: u64,
    /// Transitions classified as bans
    pub ban_events: u64,
    /// Ban events that failed a precondition
    pub skipped: u64,
    /// Admins demoted and banned
    pub punishments: u64,
    /// Admins demoted whose ban failed
    pub partial_punishments: u64,
    /// Demotions that failed
    pub punishment_failures: u64,
    /// Deregistrations not persisted
    pub persistence_failures: u64,
    /// Alerts not delivered
    pub notification_failures: u64,
    /// Seconds since the last punishment
    pub secs_since_punishment: Option<u64>,
}
