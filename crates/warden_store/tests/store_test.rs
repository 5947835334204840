//! Tests for the config store contract.

use std::sync::Arc;
use warden_core::{ChannelId, UserId};
use warden_store::{
    ConfigPersistence, ConfigStore, GuardConfig, JsonConfigStore, JsonFilePersistence,
    MemoryPersistence, PersistedConfigStore,
};

#[tokio::test]
async fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonConfigStore::open_file(dir.path().join("config.json"))
        .await
        .expect("open store");

    let config = store.snapshot();
    assert!(config.auto_ban_enabled);
    assert!(config.notification_enabled);
    assert!(config.protected_channels.is_empty());
    assert!(config.monitored_admins.is_empty());
    assert!(!store.is_dirty());
}

#[tokio::test]
async fn test_mutations_are_persisted_and_reloaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("config.json");

    let store = JsonConfigStore::open_file(&path).await.expect("open store");
    assert!(store.add_protected_channel(ChannelId(-100123)).await.expect("add channel"));
    assert!(store.add_monitored_admin(UserId(555)).await.expect("add admin"));
    assert!(store.set_notification_enabled(false).await.expect("toggle"));
    drop(store);

    let reopened = JsonConfigStore::open_file(&path).await.expect("reopen store");
    assert!(reopened.is_protected(ChannelId(-100123)));
    assert!(reopened.is_monitored(UserId(555)));
    assert!(!reopened.notification_enabled());
    assert!(reopened.auto_ban_enabled());
}

#[tokio::test]
async fn test_record_uses_flat_integer_lists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");

    let store = JsonConfigStore::open_file(&path).await.expect("open store");
    store.add_protected_channel(ChannelId(-100123)).await.expect("add channel");
    store.add_monitored_admin(UserId(555)).await.expect("add admin");

    let raw = std::fs::read_to_string(&path).expect("read file");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(value["protected_channels"], serde_json::json!([-100123]));
    assert_eq!(value["monitored_admins"], serde_json::json!([555]));
    assert_eq!(value["auto_ban_enabled"], serde_json::json!(true));
    assert_eq!(value["notification_enabled"], serde_json::json!(true));
}

#[tokio::test]
async fn test_duplicate_add_is_noop() {
    let medium = Arc::new(MemoryPersistence::new());
    let store = PersistedConfigStore::open(Arc::clone(&medium))
        .await
        .expect("open store");

    assert!(store.add_monitored_admin(UserId(555)).await.expect("first add"));
    assert!(!store.add_monitored_admin(UserId(555)).await.expect("second add"));
    assert_eq!(store.snapshot().monitored_admins.len(), 1);
    assert_eq!(medium.save_count(), 1);
}

#[tokio::test]
async fn test_remove_absent_is_noop() {
    let medium = Arc::new(MemoryPersistence::new());
    let store = PersistedConfigStore::open(Arc::clone(&medium))
        .await
        .expect("open store");

    assert!(!store.remove_monitored_admin(UserId(555)).await.expect("remove"));
    assert!(!store.remove_protected_channel(ChannelId(-1)).await.expect("remove"));
    assert_eq!(medium.save_count(), 0);
}

#[tokio::test]
async fn test_save_failure_keeps_in_memory_mutation() {
    let mut initial = GuardConfig::default();
    initial.monitored_admins.insert(UserId(555));
    let medium = Arc::new(MemoryPersistence::with_config(initial));
    let store = PersistedConfigStore::open(Arc::clone(&medium))
        .await
        .expect("open store");

    medium.set_failing(true);
    let err = store
        .remove_monitored_admin(UserId(555))
        .await
        .expect_err("save should fail");
    assert!(err.is_persist());

    assert!(!store.is_monitored(UserId(555)));
    assert!(store.is_dirty());
    let saved = medium.saved().expect("initial record");
    assert!(saved.is_monitored(UserId(555)));

    medium.set_failing(false);
    store.flush().await.expect("flush succeeds");
    assert!(!store.is_dirty());
    assert!(!medium.saved().expect("saved record").is_monitored(UserId(555)));
}

#[tokio::test]
async fn test_flush_when_clean_does_not_write() {
    let medium = Arc::new(MemoryPersistence::new());
    let store = PersistedConfigStore::open(Arc::clone(&medium))
        .await
        .expect("open store");

    store.flush().await.expect("flush");
    assert_eq!(medium.save_count(), 0);
}

#[tokio::test]
async fn test_flag_setters_report_changes() {
    let store = warden_store::MemoryConfigStore::in_memory(GuardConfig::default());
    assert!(!store.set_auto_ban_enabled(true).await.expect("same value"));
    assert!(store.set_auto_ban_enabled(false).await.expect("new value"));
    assert!(!store.auto_ban_enabled());
}

#[tokio::test]
async fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("write file");

    let result = JsonFilePersistence::new(&path).load().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_partial_record_fills_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"protected_channels": [-100123], "auto_ban_enabled": false}"#)
        .expect("write file");

    let store = JsonConfigStore::open_file(&path).await.expect("open store");
    assert!(store.is_protected(ChannelId(-100123)));
    assert!(!store.auto_ban_enabled());
    assert!(store.notification_enabled());
    assert!(store.snapshot().monitored_admins.is_empty());
}
