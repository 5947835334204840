//! Health endpoint served over a real socket.

use std::sync::Arc;
use warden::{
    ApiState, ChannelId, ConfigStore, GuardConfig, GuardMetrics, MemoryConfigStore, UserId,
    create_router,
};

async fn serve(state: ApiState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("serve");
    });
    format!("http://{}", addr)
}

fn store() -> Arc<MemoryConfigStore> {
    let mut config = GuardConfig::default();
    config.protected_channels.insert(ChannelId(-100123));
    config.monitored_admins.insert(UserId(555));
    config.monitored_admins.insert(UserId(556));
    Arc::new(MemoryConfigStore::in_memory(config))
}

#[tokio::test]
async fn test_health_reports_ok() {
    let base = serve(ApiState::new(GuardMetrics::new(), store())).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_metrics_reflect_recorded_events() {
    let metrics = GuardMetrics::new();
    metrics.record_transition();
    metrics.record_ban_event();
    metrics.record_punishment(false);
    let base = serve(ApiState::new(metrics, store())).await;

    let body: serde_json::Value = reqwest::get(format!("{}/metrics", base))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["transitions"], 1);
    assert_eq!(body["ban_events"], 1);
    assert_eq!(body["punishments"], 0);
    assert_eq!(body["partial_punishments"], 1);
}

#[tokio::test]
async fn test_status_follows_the_store() {
    let store = store();
    let base = serve(ApiState::new(GuardMetrics::new(), store.clone())).await;

    store.set_auto_ban_enabled(false).await.expect("switch");
    store.persistence().set_failing(true);
    let _ = store.remove_monitored_admin(UserId(556)).await;

    let body: serde_json::Value = reqwest::get(format!("{}/status", base))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["protected_channels"], 1);
    assert_eq!(body["monitored_admins"], 1);
    assert_eq!(body["auto_ban_enabled"], false);
    assert_eq!(body["notification_enabled"], true);
    assert_eq!(body["unsaved_changes"], true);
}
