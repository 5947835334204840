//! Long-polling ingestion loop.

use crate::convert::{to_transition, user_ref};
use crate::types::{Message, Update};
use crate::{Command, CommandHandler, TelegramClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use warden_core::ChannelId;
use warden_error::{PlatformErrorKind, PlatformResult};
use warden_guard::Guard;
use warden_store::ConfigStore;

/// Pulls updates from the Bot API and feeds them to the guard and the
/// command handler, one at a time.
pub struct UpdatePoller {
    client: TelegramClient,
    guard: Arc<Guard>,
    commands: Arc<CommandHandler>,
    store: Arc<dyn ConfigStore>,
    bot_username: Option<String>,
    poll_timeout_secs: u64,
    error_backoff: Duration,
    offset: Option<i64>,
}

impl std::fmt::Debug for UpdatePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePoller")
            .field("bot_username", &self.bot_username)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl UpdatePoller {
    /// Poller with a 30 s long-poll timeout and a 5 s error backoff.
    pub fn new(
        client: TelegramClient,
        guard: Arc<Guard>,
        commands: Arc<CommandHandler>,
        store: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            client,
            guard,
            commands,
            store,
            bot_username: None,
            poll_timeout_secs: 30,
            error_backoff: Duration::from_secs(5),
            offset: None,
        }
    }

    /// Long-poll timeout passed to `getUpdates`.
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }

    /// Pause after a failed poll.
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// The bot's handle, used to ignore commands meant for other bots.
    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }

    /// Next update ID to request.
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Fetch and process one batch. Returns the number of updates handled.
    ///
    /// # Errors
    ///
    /// Returns error if `getUpdates` fails.
    pub async fn poll_once(&mut self) -> PlatformResult<usize> {
        let updates = self
            .client
            .get_updates(self.offset, self.poll_timeout_secs)
            .await?;
        Ok(self.process(updates).await)
    }

    async fn process(&mut self, updates: Vec<Update>) -> usize {
        let count = updates.len();
        for update in updates {
            self.offset = Some(update.update_id + 1);
            self.handle_update(update).await;
        }
        self.flush_store().await;
        count
    }

    /// Route one update.
    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    pub async fn handle_update(&self, update: Update) {
        if let Some(change) = update.chat_member {
            let transition = to_transition(&change);
            if let Some(outcome) = self.guard.handle_transition(&transition).await {
                info!(?outcome, "Ban event processed");
            }
        }
        if let Some(message) = update.message {
            self.handle_message(message).await;
        }
    }

    async fn handle_message(&self, message: Message) {
        let (Some(text), Some(from)) = (message.text.as_deref(), message.from.as_ref()) else {
            return;
        };
        let Some(command) = Command::parse(text, self.bot_username.as_deref()) else {
            return;
        };
        let chat = ChannelId(message.chat.id);
        let reply = self.commands.handle(chat, &user_ref(from), &command).await;
        if let Err(e) = self.client.send_message(chat, &reply).await {
            warn!(error = %e, %command, "Failed to send command reply");
        }
    }

    async fn flush_store(&self) {
        if !self.store.is_dirty() {
            return;
        }
        match self.store.flush().await {
            Ok(()) => debug!("Pending config changes flushed"),
            Err(e) => warn!(error = %e, "Config flush failed, will retry"),
        }
    }

    /// Poll until `shutdown` turns true or its sender is dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the bot token is rejected; every other failure is
    /// retried after the backoff.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> PlatformResult<()> {
        info!(timeout_secs = self.poll_timeout_secs, "Update poller started");
        while !*shutdown.borrow() {
            let fetched = tokio::select! {
                _ = shutdown.changed() => break,
                fetched = self.client.get_updates(self.offset, self.poll_timeout_secs) => fetched,
            };

            let e = match fetched {
                Ok(updates) => {
                    self.process(updates).await;
                    continue;
                }
                Err(e) => e,
            };

            if matches!(e.kind(), PlatformErrorKind::Unauthorized) {
                error!(error = %e, "Bot token rejected, stopping");
                self.flush_store().await;
                return Err(e);
            }
            let delay = match e.kind() {
                PlatformErrorKind::RateLimited { retry_after } => Duration::from_secs(*retry_after),
                _ => self.error_backoff,
            };
            warn!(error = %e, delay_secs = delay.as_secs(), "Polling failed, backing off");
            self.flush_store().await;
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        self.flush_store().await;
        info!("Update poller stopped");
        Ok(())
    }
}
