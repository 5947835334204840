//! The config store contract and its write-through implementation.

use crate::{ConfigPersistence, GuardConfig, JsonFilePersistence, MemoryPersistence};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};
use warden_core::{ChannelId, UserId};
use warden_error::StoreResult;

/// Access to the guard record.
///
/// Mutations are applied to the in-memory record first and then persisted.
/// When persisting fails the mutation is kept, the store reports itself
/// dirty and the error is returned; callers retry with [`ConfigStore::flush`].
/// Mutating methods return whether anything changed, so repeated calls are
/// no-ops.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Copy of the current in-memory record.
    fn snapshot(&self) -> GuardConfig;

    /// Whether the channel is under supervision.
    fn is_protected(&self, channel: ChannelId) -> bool {
        self.snapshot().is_protected(channel)
    }

    /// Whether the user is on the watch list.
    fn is_monitored(&self, user: UserId) -> bool {
        self.snapshot().is_monitored(user)
    }

    /// Master remediation switch.
    fn auto_ban_enabled(&self) -> bool {
        self.snapshot().auto_ban_enabled
    }

    /// Post-remediation alert switch.
    fn notification_enabled(&self) -> bool {
        self.snapshot().notification_enabled
    }

    /// Put a channel under supervision.
    async fn add_protected_channel(&self, channel: ChannelId) -> StoreResult<bool>;

    /// Stop supervising a channel.
    async fn remove_protected_channel(&self, channel: ChannelId) -> StoreResult<bool>;

    /// Put a user on the watch list.
    async fn add_monitored_admin(&self, user: UserId) -> StoreResult<bool>;

    /// Take a user off the watch list.
    async fn remove_monitored_admin(&self, user: UserId) -> StoreResult<bool>;

    /// Switch remediation on or off.
    async fn set_auto_ban_enabled(&self, enabled: bool) -> StoreResult<bool>;

    /// Switch post-remediation alerts on or off.
    async fn set_notification_enabled(&self, enabled: bool) -> StoreResult<bool>;

    /// Whether the in-memory record has changes the medium has not seen.
    fn is_dirty(&self) -> bool;

    /// Persist the in-memory record if it is dirty.
    async fn flush(&self) -> StoreResult<()>;
}

#[derive(Debug)]
struct StoreState {
    config: GuardConfig,
    revision: u64,
    persisted_revision: u64,
}

/// Config store holding the authoritative record in memory and writing
/// every change through to a [`ConfigPersistence`] medium.
///
/// Assumes a single writer process; the mutex only keeps the record
/// consistent between concurrent tasks of that process.
#[derive(Debug)]
pub struct PersistedConfigStore<P> {
    persistence: P,
    state: Mutex<StoreState>,
}

/// Store backed by a JSON file.
pub type JsonConfigStore = PersistedConfigStore<JsonFilePersistence>;

/// Store backed by process memory.
pub type MemoryConfigStore = PersistedConfigStore<MemoryPersistence>;

impl<P: ConfigPersistence> PersistedConfigStore<P> {
    /// Load the record from `persistence`, falling back to the default when
    /// nothing is stored yet.
    #[instrument(skip(persistence))]
    pub async fn open(persistence: P) -> StoreResult<Self> {
        let config = match persistence.load().await? {
            Some(config) => config,
            None => {
                info!("No stored guard config, starting from defaults");
                GuardConfig::default()
            }
        };
        info!(
            protected_channels = config.protected_channels.len(),
            monitored_admins = config.monitored_admins.len(),
            auto_ban_enabled = config.auto_ban_enabled,
            "Config store opened"
        );
        Ok(Self::with_config(persistence, config))
    }

    /// Start from an explicit record without reading the medium.
    pub fn with_config(persistence: P, config: GuardConfig) -> Self {
        Self {
            persistence,
            state: Mutex::new(StoreState {
                config,
                revision: 0,
                persisted_revision: 0,
            }),
        }
    }

    /// The medium behind this store.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    async fn mutate<F>(&self, change: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut GuardConfig) -> bool + Send,
    {
        let (revision, config) = {
            let mut state = self.state.lock();
            if !change(&mut state.config) {
                return Ok(false);
            }
            state.revision += 1;
            (state.revision, state.config.clone())
        };
        self.persist(revision, &config).await?;
        Ok(true)
    }

    async fn persist(&self, revision: u64, config: &GuardConfig) -> StoreResult<()> {
        match self.persistence.save(config).await {
            Ok(()) => {
                let mut state = self.state.lock();
                state.persisted_revision = state.persisted_revision.max(revision);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, revision, "Failed to persist guard config; in-memory state kept");
                Err(e)
            }
        }
    }
}

impl JsonConfigStore {
    /// Open the store kept in the JSON file at `path`.
    pub async fn open_file(path: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open(JsonFilePersistence::new(path)).await
    }
}

impl MemoryConfigStore {
    /// In-memory store starting from `config`.
    pub fn in_memory(config: GuardConfig) -> Self {
        Self::with_config(MemoryPersistence::new(), config)
    }
}

#[async_trait]
impl<P: ConfigPersistence> ConfigStore for PersistedConfigStore<P> {
    fn snapshot(&self) -> GuardConfig {
        self.state.lock().config.clone()
    }

    fn is_protected(&self, channel: ChannelId) -> bool {
        self.state.lock().config.is_protected(channel)
    }

    fn is_monitored(&self, user: UserId) -> bool {
        self.state.lock().config.is_monitored(user)
    }

    fn auto_ban_enabled(&self) -> bool {
        self.state.lock().config.auto_ban_enabled
    }

    fn notification_enabled(&self) -> bool {
        self.state.lock().config.notification_enabled
    }

    #[instrument(skip(self), fields(channel_id = %channel))]
    async fn add_protected_channel(&self, channel: ChannelId) -> StoreResult<bool> {
        let changed = self
            .mutate(|config| config.protected_channels.insert(channel))
            .await?;
        if changed {
            info!("Channel added to protection");
        } else {
            debug!("Channel already protected");
        }
        Ok(changed)
    }

    #[instrument(skip(self), fields(channel_id = %channel))]
    async fn remove_protected_channel(&self, channel: ChannelId) -> StoreResult<bool> {
        let changed = self
            .mutate(|config| config.protected_channels.remove(&channel))
            .await?;
        if changed {
            info!("Channel removed from protection");
        }
        Ok(changed)
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn add_monitored_admin(&self, user: UserId) -> StoreResult<bool> {
        let changed = self
            .mutate(|config| config.monitored_admins.insert(user))
            .await?;
        if changed {
            info!("Admin added to watch list");
        } else {
            debug!("Admin already monitored");
        }
        Ok(changed)
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn remove_monitored_admin(&self, user: UserId) -> StoreResult<bool> {
        let changed = self
            .mutate(|config| config.monitored_admins.remove(&user))
            .await?;
        if changed {
            info!("Admin removed from watch list");
        }
        Ok(changed)
    }

    #[instrument(skip(self))]
    async fn set_auto_ban_enabled(&self, enabled: bool) -> StoreResult<bool> {
        self.mutate(|config| {
            let changed = config.auto_ban_enabled != enabled;
            config.auto_ban_enabled = enabled;
            changed
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_notification_enabled(&self, enabled: bool) -> StoreResult<bool> {
        self.mutate(|config| {
            let changed = config.notification_enabled != enabled;
            config.notification_enabled = enabled;
            changed
        })
        .await
    }

    fn is_dirty(&self) -> bool {
        let state = self.state.lock();
        state.revision > state.persisted_revision
    }

    #[instrument(skip(self))]
    async fn flush(&self) -> StoreResult<()> {
        let (revision, config) = {
            let state = self.state.lock();
            if state.revision <= state.persisted_revision {
                return Ok(());
            }
            (state.revision, state.config.clone())
        };
        self.persist(revision, &config).await?;
        info!(revision, "Pending guard config changes flushed");
        Ok(())
    }
}
