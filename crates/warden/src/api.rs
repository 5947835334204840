//! HTTP API for health checks and guard metrics.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use warden_guard::GuardMetrics;
use warden_store::ConfigStore;

/// API state shared by the handlers.
#[derive(Clone)]
pub struct ApiState {
    metrics: GuardMetrics,
    store: Arc<dyn ConfigStore>,
    started: Instant,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(metrics: GuardMetrics, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            metrics,
            store,
            started: Instant::now(),
        }
    }

    /// Current guard configuration summary.
    pub fn status(&self) -> StatusReport {
        let config = self.store.snapshot();
        StatusReport {
            protected_channels: config.protected_channels.len(),
            monitored_admins: config.monitored_admins.len(),
            auto_ban_enabled: config.auto_ban_enabled,
            notification_enabled: config.notification_enabled,
            unsaved_changes: self.store.is_dirty(),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Number of protected channels
    pub protected_channels: usize,
    /// Number of monitored admins
    pub monitored_admins: usize,
    /// Auto-ban switch
    pub auto_ban_enabled: bool,
    /// Notification switch
    pub notification_enabled: bool,
    /// The in-memory configuration differs from what is on disk
    pub unsaved_changes: bool,
    /// Seconds since the API state was created
    pub uptime_secs: u64,
}

/// Creates the API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/status", get(get_status))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn get_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}

async fn get_status(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.status()))
}
