//! Shared mocks and fixtures for guard tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use warden_core::{
    BanEvent, ChannelId, MemberStatus, MembershipTransition, MembershipTransitionBuilder,
    UserId, UserRef,
};
use warden_error::{PlatformError, PlatformErrorKind, PlatformResult};
use warden_guard::{MembershipApi, MemoryAuditLog, Notifier, RemediationEngine};
use warden_store::{GuardConfig, MemoryConfigStore};

pub const CHANNEL: ChannelId = ChannelId(-100123);
pub const ADMIN: i64 = 555;
pub const SUBJECT: i64 = 777;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Lookup(ChannelId, UserId),
    Demote(ChannelId, UserId),
    Ban(ChannelId, UserId),
}

/// Membership API that answers from a table and records every call.
#[derive(Debug, Default)]
pub struct MockMembership {
    statuses: Mutex<HashMap<UserId, MemberStatus>>,
    banned: Mutex<Vec<UserId>>,
    lookup_error: Mutex<Option<PlatformErrorKind>>,
    demote_error: Mutex<Option<PlatformErrorKind>>,
    ban_error: Mutex<Option<PlatformErrorKind>>,
    calls: Mutex<Vec<Call>>,
}

impl MockMembership {
    pub fn set_status(&self, user: i64, status: MemberStatus) {
        self.statuses.lock().insert(UserId(user), status);
    }

    pub fn fail_lookup(&self, kind: PlatformErrorKind) {
        *self.lookup_error.lock() = Some(kind);
    }

    pub fn fail_demote(&self, kind: PlatformErrorKind) {
        *self.demote_error.lock() = Some(kind);
    }

    pub fn fail_ban(&self, kind: PlatformErrorKind) {
        *self.ban_error.lock() = Some(kind);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn demoted(&self) -> Vec<UserId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Demote(_, user) => Some(user),
                _ => None,
            })
            .collect()
    }

    pub fn ban_attempts(&self) -> Vec<UserId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Ban(_, user) => Some(user),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MembershipApi for MockMembership {
    async fn get_member_status(
        &self,
        channel: ChannelId,
        user: UserId,
    ) -> PlatformResult<MemberStatus> {
        self.calls.lock().push(Call::Lookup(channel, user));
        if let Some(kind) = self.lookup_error.lock().clone() {
            return Err(PlatformError::new(kind));
        }
        Ok(self
            .statuses
            .lock()
            .get(&user)
            .copied()
            .unwrap_or(MemberStatus::Member))
    }

    async fn demote(&self, channel: ChannelId, user: UserId) -> PlatformResult<()> {
        self.calls.lock().push(Call::Demote(channel, user));
        if let Some(kind) = self.demote_error.lock().clone() {
            return Err(PlatformError::new(kind));
        }
        Ok(())
    }

    async fn ban(&self, channel: ChannelId, user: UserId) -> PlatformResult<()> {
        self.calls.lock().push(Call::Ban(channel, user));
        if let Some(kind) = self.ban_error.lock().clone() {
            return Err(PlatformError::new(kind));
        }
        let mut banned = self.banned.lock();
        if banned.contains(&user) {
            return Err(PlatformError::new(PlatformErrorKind::AlreadyBanned(
                "user is already banned".to_string(),
            )));
        }
        banned.push(user);
        Ok(())
    }
}

/// Notifier that keeps every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(ChannelId, String)>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel: ChannelId, text: &str) -> PlatformResult<()> {
        if *self.failing.lock() {
            return Err(PlatformError::new(PlatformErrorKind::Transport(
                "connection reset".to_string(),
            )));
        }
        self.sent.lock().push((channel, text.to_string()));
        Ok(())
    }
}

pub struct Fixture {
    pub store: Arc<MemoryConfigStore>,
    pub membership: Arc<MockMembership>,
    pub notifier: Arc<RecordingNotifier>,
    pub audit: Arc<MemoryAuditLog>,
}

impl Fixture {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            store: Arc::new(MemoryConfigStore::in_memory(config)),
            membership: Arc::new(MockMembership::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            audit: Arc::new(MemoryAuditLog::new()),
        }
    }

    /// Channel protected, admin monitored, both flags on.
    pub fn protected() -> Self {
        Self::new(protected_config())
    }

    pub fn engine(&self) -> RemediationEngine {
        RemediationEngine::new(
            self.store.clone(),
            self.membership.clone(),
            self.notifier.clone(),
            self.audit.clone(),
        )
    }
}

pub fn protected_config() -> GuardConfig {
    let mut config = GuardConfig::default();
    config.protected_channels.insert(CHANNEL);
    config.monitored_admins.insert(UserId(ADMIN));
    config
}

pub fn ban_event() -> BanEvent {
    BanEvent {
        channel_id: CHANNEL,
        actor: UserRef::new(ADMIN).with_username("mallory"),
        subject: UserRef::new(SUBJECT),
        old_status: MemberStatus::Member,
    }
}

pub fn ban_transition(actor: Option<i64>) -> MembershipTransition {
    let mut builder = MembershipTransitionBuilder::default();
    builder
        .channel_id(CHANNEL)
        .subject(UserRef::new(SUBJECT))
        .old_status(MemberStatus::Member)
        .new_status(MemberStatus::Kicked);
    if let Some(actor) = actor {
        builder.actor(UserRef::new(actor));
    }
    builder.build().expect("valid transition")
}
