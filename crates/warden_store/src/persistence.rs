//! Durable media for the guard record.

use crate::GuardConfig;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use warden_error::{StoreError, StoreErrorKind, StoreResult};

/// Where a [`GuardConfig`] is kept between runs.
#[async_trait]
pub trait ConfigPersistence: Send + Sync {
    /// Read the stored record, or `None` when nothing has been stored yet.
    async fn load(&self) -> StoreResult<Option<GuardConfig>>;

    /// Replace the stored record with `config`.
    async fn save(&self, config: &GuardConfig) -> StoreResult<()>;
}

/// JSON file medium.
///
/// Writes go to a sibling temp file which is synced and then renamed over
/// the target, so a crash leaves either the old or the new record.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Create a medium backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "config.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn persist_error(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::new(StoreErrorKind::Persist(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl ConfigPersistence for JsonFilePersistence {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> StoreResult<Option<GuardConfig>> {
        debug!("Loading guard config");
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::new(StoreErrorKind::Read(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))));
            }
        };
        if json.trim().is_empty() {
            return Ok(None);
        }
        let config = serde_json::from_str(&json).map_err(|e| {
            StoreError::new(StoreErrorKind::Parse(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        info!("Guard config loaded");
        Ok(Some(config))
    }

    #[instrument(skip(self, config), fields(path = %self.path.display()))]
    async fn save(&self, config: &GuardConfig) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| StoreError::new(StoreErrorKind::Serialize(e.to_string())))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| persist_error(parent, e))?;
        }

        let temp = self.temp_path();
        let mut file = tokio::fs::File::create(&temp)
            .await
            .map_err(|e| persist_error(&temp, e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| persist_error(&temp, e))?;
        file.sync_all().await.map_err(|e| persist_error(&temp, e))?;
        drop(file);

        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| persist_error(&self.path, e))?;
        debug!("Guard config saved");
        Ok(())
    }
}

/// In-process medium.
///
/// Keeps the last saved record in memory. Saves can be made to fail on
/// demand to exercise persistence-failure handling.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    saved: Mutex<Option<GuardConfig>>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    /// Empty medium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Medium that already holds `config`.
    pub fn with_config(config: GuardConfig) -> Self {
        Self {
            saved: Mutex::new(Some(config)),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Last successfully saved record.
    pub fn saved(&self) -> Option<GuardConfig> {
        self.saved.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigPersistence for MemoryPersistence {
    async fn load(&self) -> StoreResult<Option<GuardConfig>> {
        Ok(self.saved.lock().clone())
    }

    async fn save(&self, config: &GuardConfig) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::new(StoreErrorKind::Persist(
                "memory medium set to fail".to_string(),
            )));
        }
        *self.saved.lock() = Some(config.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// Lets a test keep a handle on the medium while the store owns it.
#[async_trait]
impl<P: ConfigPersistence + ?Sized> ConfigPersistence for std::sync::Arc<P> {
    async fn load(&self) -> StoreResult<Option<GuardConfig>> {
        (**self).load().await
    }

    async fn save(&self, config: &GuardConfig) -> StoreResult<()> {
        (**self).save(config).await
    }
}
