//! JSON-lines audit log.

use chrono::{Duration, Utc};
use warden_core::{ChannelId, UserId, UserRef};
use warden_guard::{AuditAction, AuditEntry, AuditLog, JsonlAuditLog};

fn ban_entry(admin: i64, subject: i64) -> AuditEntry {
    AuditEntry::new(AuditAction::AdminBannedForAbuse)
        .user(&UserRef::new(subject))
        .chat(ChannelId(-100123))
        .admin(&UserRef::new(admin).with_username("mallory"))
        .reason(format!("Banned regular member {}", subject))
}

#[tokio::test]
async fn test_append_creates_directory_and_writes_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logs").join("actions.jsonl");
    let log = JsonlAuditLog::new(&path);

    log.append(AuditEntry::new(AuditAction::BotStarted))
        .await
        .expect("append");
    log.append(ban_entry(555, 777)).await.expect("append");

    let raw = std::fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines.len(), 2);

    let second: serde_json::Value = serde_json::from_str(lines[1]).expect("json line");
    assert_eq!(second["action"], "admin_banned_for_abuse");
    assert_eq!(second["admin_id"], 555);
    assert_eq!(second["admin_username"], "mallory");
    assert_eq!(second["user_id"], 777);
    assert_eq!(second["chat_id"], -100123);
    assert!(second.get("username").is_none());
}

#[tokio::test]
async fn test_recent_returns_tail_and_skips_garbage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("actions.jsonl");
    let log = JsonlAuditLog::new(&path);

    for subject in 1..=5 {
        log.append(ban_entry(555, subject)).await.expect("append");
    }
    let mut raw = std::fs::read_to_string(&path).expect("read log");
    raw.push_str("not json\n\n");
    std::fs::write(&path, raw).expect("write log");

    let recent = log.recent(2).await.expect("recent");
    let subjects: Vec<_> = recent.iter().filter_map(|e| e.user_id).collect();
    assert_eq!(subjects, vec![UserId(4), UserId(5)]);
}

#[tokio::test]
async fn test_missing_file_reads_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = JsonlAuditLog::new(dir.path().join("absent.jsonl"));
    assert!(log.recent(10).await.expect("recent").is_empty());
}

#[tokio::test]
async fn test_filters_by_action_and_admin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = JsonlAuditLog::new(dir.path().join("actions.jsonl"));

    log.append(ban_entry(555, 1)).await.expect("append");
    log.append(ban_entry(666, 2)).await.expect("append");
    log.append(
        AuditEntry::new(AuditAction::AdminAddedToMonitor).user(&UserRef::new(888)),
    )
    .await
    .expect("append");

    let bans = log
        .by_action(AuditAction::AdminBannedForAbuse, 10)
        .await
        .expect("by action");
    assert_eq!(bans.len(), 2);

    let by_666 = log.by_admin(UserId(666), 10).await.expect("by admin");
    assert_eq!(by_666.len(), 1);
    assert_eq!(by_666[0].user_id, Some(UserId(2)));
}

#[tokio::test]
async fn test_prune_drops_old_entries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = JsonlAuditLog::new(dir.path().join("actions.jsonl"));

    log.append(ban_entry(555, 1).at(Utc::now() - Duration::days(45)))
        .await
        .expect("append");
    for user in 2..=4 {
        log.append(ban_entry(555, user).at(Utc::now() - Duration::days(2)))
            .await
            .expect("append");
    }

    let removed = log.prune_older_than(30).await.expect("prune");
    assert_eq!(removed, 1);

    let remaining = log.recent(10).await.expect("recent");
    assert_eq!(remaining.len(), 3);
    assert_eq!(remaining[0].user_id, Some(UserId(2)));

    assert_eq!(log.prune_older_than(30).await.expect("prune again"), 0);
}

#[tokio::test]
async fn test_prune_with_huge_window_keeps_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = JsonlAuditLog::new(dir.path().join("actions.jsonl"));
    log.append(ban_entry(555, 1).at(Utc::now() - Duration::days(45)))
        .await
        .expect("append");

    let removed = log.prune_older_than(1_000_000_000).await.expect("prune");
    assert_eq!(removed, 0);
    assert_eq!(log.recent(10).await.expect("recent").len(), 1);

    let empty = JsonlAuditLog::new(dir.path().join("empty.jsonl"));
    assert_eq!(empty.prune_older_than(i64::MAX).await.expect("prune"), 0);
}
