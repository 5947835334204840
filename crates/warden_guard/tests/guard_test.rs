//! End-to-end pipeline: transition in, outcome out.

mod common;

use common::{ADMIN, CHANNEL, Fixture, SUBJECT, ban_transition};
use std::sync::Arc;
use warden_core::{BanPolicy, MemberStatus, RemediationOutcome, SkipReason, UserId};
use warden_guard::{AuditAction, Guard, MemoryAuditLog, NoOpNotifier, RemediationEngine};
use warden_store::{ConfigStore, GuardConfig};

fn guard(fx: &Fixture) -> Guard {
    Guard::new(
        fx.engine(),
        fx.store.clone(),
        fx.audit.clone(),
        BanPolicy::default(),
    )
}

#[tokio::test]
async fn test_admin_ban_in_protected_channel() {
    let fx = Fixture::protected();
    let guard = guard(&fx);

    let outcome = guard
        .handle_transition(&ban_transition(Some(ADMIN)))
        .await
        .expect("ban event");

    assert!(outcome.is_punished());
    assert!(!fx.store.is_monitored(UserId(ADMIN)));
    assert_eq!(
        fx.audit.actions(),
        vec![AuditAction::MemberBanned, AuditAction::AdminBannedForAbuse]
    );

    let snapshot = guard.metrics().snapshot();
    assert_eq!(snapshot.transitions, 1);
    assert_eq!(snapshot.ban_events, 1);
    assert_eq!(snapshot.punishments, 1);
}

#[tokio::test]
async fn test_anonymous_ban_is_ignored() {
    let fx = Fixture::protected();
    let guard = guard(&fx);

    assert!(guard.handle_transition(&ban_transition(None)).await.is_none());
    assert!(fx.membership.calls().is_empty());
    assert!(fx.audit.entries().is_empty());
    assert!(fx.store.is_monitored(UserId(ADMIN)));
}

#[tokio::test]
async fn test_unprotected_channel_not_audited() {
    let fx = Fixture::new(GuardConfig::default());
    let guard = guard(&fx);

    let outcome = guard.handle_transition(&ban_transition(Some(ADMIN))).await;

    assert_eq!(
        outcome,
        Some(RemediationOutcome::skipped(SkipReason::ChannelNotProtected))
    );
    assert!(fx.audit.entries().is_empty());
    assert_eq!(guard.metrics().snapshot().skipped, 1);
}

#[tokio::test]
async fn test_ban_by_unmonitored_admin_is_audited_only() {
    let fx = Fixture::protected();
    let guard = guard(&fx);

    let outcome = guard.handle_transition(&ban_transition(Some(999))).await;

    assert_eq!(
        outcome,
        Some(RemediationOutcome::skipped(SkipReason::ActorNotMonitored))
    );
    let entries = fx.audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::MemberBanned);
    assert_eq!(entries[0].chat_id, Some(CHANNEL));
    assert_eq!(entries[0].user_id, Some(UserId(SUBJECT)));
    assert_eq!(entries[0].admin_id, Some(UserId(999)));
}

#[tokio::test]
async fn test_non_ban_transition_returns_none() {
    let fx = Fixture::protected();
    let guard = guard(&fx);
    let mut transition = ban_transition(Some(ADMIN));
    transition.new_status = MemberStatus::Left;

    assert!(guard.handle_transition(&transition).await.is_none());
    assert_eq!(guard.metrics().snapshot().transitions, 1);
    assert_eq!(guard.metrics().snapshot().ban_events, 0);
}

#[tokio::test]
async fn test_left_to_kicked_follows_policy() {
    let fx = Fixture::protected();
    let mut transition = ban_transition(Some(ADMIN));
    transition.old_status = MemberStatus::Left;

    let excluding = guard(&fx);
    assert!(excluding.handle_transition(&transition).await.is_none());

    let including = Guard::new(
        fx.engine(),
        fx.store.clone(),
        fx.audit.clone(),
        BanPolicy::including_left(),
    );
    let outcome = including.handle_transition(&transition).await;
    assert!(outcome.is_some_and(|o| o.is_punished()));
}

#[tokio::test]
async fn test_silent_notifier_still_punishes() {
    let fx = Fixture::protected();
    let audit = Arc::new(MemoryAuditLog::new());
    let engine = RemediationEngine::new(
        fx.store.clone(),
        fx.membership.clone(),
        Arc::new(NoOpNotifier),
        audit.clone(),
    );
    let guard = Guard::new(engine, fx.store.clone(), audit.clone(), BanPolicy::default());

    let outcome = guard.handle_transition(&ban_transition(Some(ADMIN))).await;

    assert!(outcome.is_some_and(|o| o.is_punished()));
    assert!(fx.notifier.sent().is_empty());
    assert_eq!(audit.entries().len(), 2);
}
