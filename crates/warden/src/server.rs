//! Process wiring: store, audit log, Bot API client, guard, poller and the
//! health endpoint.

use crate::api::{ApiState, create_router};
use crate::settings::WardenSettings;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use warden_core::{ChannelId, UserId, UserRef};
use warden_error::{ConfigError, WardenResult};
use warden_guard::{
    AuditAction, AuditEntry, AuditLog, Guard, GuardMetrics, JsonlAuditLog, RemediationEngine,
};
use warden_store::{ConfigStore, JsonConfigStore};
use warden_telegram::{CommandHandler, TelegramClient, UpdatePoller, check_bot_permissions};

/// Long-running guard process.
#[derive(Debug)]
pub struct WardenServer {
    settings: WardenSettings,
}

impl WardenServer {
    /// Creates a new server.
    pub fn new(settings: WardenSettings) -> Self {
        Self { settings }
    }

    /// Run until Ctrl-C, or until the bot token is rejected.
    ///
    /// # Errors
    ///
    /// Returns error if the token is missing or rejected, the config store
    /// cannot be opened, or the health endpoint cannot bind.
    #[instrument(skip(self))]
    pub async fn run(self) -> WardenResult<()> {
        let settings = &self.settings;
        info!("Starting warden");

        let token = settings.bot_token()?;
        let store = Arc::new(JsonConfigStore::open_file(&settings.storage.config_path).await?);
        let audit = Arc::new(JsonlAuditLog::new(&settings.storage.audit_log_path));

        match audit
            .prune_older_than(settings.storage.audit_retention_days)
            .await
        {
            Ok(0) => debug!("No audit entries past retention"),
            Ok(removed) => info!(removed, "Pruned old audit entries"),
            Err(e) => warn!(error = %e, "Audit log pruning failed"),
        }

        let client = TelegramClient::new(
            &settings.telegram.api_base,
            &token,
            settings.telegram.api_calls_per_minute,
        );
        let me = client.get_me().await?;
        let bot = UserRef {
            id: UserId(me.id),
            username: me.username.clone(),
        };
        info!(bot = %bot.label(), "Connected to Telegram");

        check_channels(&client, bot.id, store.snapshot().protected_channels.iter().copied()).await;

        if let Err(e) = audit
            .append(AuditEntry::new(AuditAction::BotStarted).user(&bot))
            .await
        {
            warn!(error = %e, "Failed to record startup");
        }

        let metrics = GuardMetrics::new();
        let platform = Arc::new(client.clone());
        let engine = RemediationEngine::new(
            store.clone(),
            platform.clone(),
            platform.clone(),
            audit.clone(),
        )
        .with_metrics(metrics.clone());
        let guard = Arc::new(Guard::new(
            engine,
            store.clone(),
            audit.clone(),
            settings.policy,
        ));
        let commands = Arc::new(CommandHandler::new(
            store.clone(),
            platform,
            audit.clone(),
            settings.telegram.api_calls_per_minute,
        ));
        let poller = UpdatePoller::new(client, guard, commands, store.clone())
            .with_poll_timeout(settings.telegram.poll_timeout_secs)
            .with_error_backoff(settings.telegram.error_backoff())
            .with_bot_username(me.username);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        if settings.health.enabled {
            let addr = settings.health.bind_addr()?;
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                ConfigError::new(format!("Failed to bind health endpoint {}: {}", addr, e))
            })?;
            let router = create_router(ApiState::new(metrics, store.clone()));
            let mut stop = shutdown_rx.clone();
            info!(%addr, "Health endpoint listening");
            tokio::spawn(async move {
                let served = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        let _ = stop.changed().await;
                    })
                    .await;
                if let Err(e) = served {
                    error!(error = %e, "Health endpoint failed");
                }
            });
        }

        let mut polling = tokio::spawn(poller.run(shutdown_rx));
        let joined = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Signal handler failed, shutting down");
                }
                info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
                (&mut polling).await
            }
            joined = &mut polling => joined,
        };
        let _ = shutdown_tx.send(true);

        let polled = match joined {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Update poller task failed");
                Ok(())
            }
        };

        if store.is_dirty() {
            store.flush().await?;
        }
        polled?;
        info!("Warden stopped");
        Ok(())
    }
}

/// Warn about every protected channel where the bot cannot remediate.
async fn check_channels(
    client: &TelegramClient,
    bot: UserId,
    channels: impl Iterator<Item = ChannelId>,
) {
    for channel in channels {
        match check_bot_permissions(client, bot, channel).await {
            Ok(permissions) if permissions.sufficient() => {
                info!(channel_id = %channel, "Bot rights verified");
            }
            Ok(_) => {}
            Err(e) => warn!(channel_id = %channel, error = %e, "Could not verify bot rights"),
        }
    }
}
