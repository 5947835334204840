//! Config store for warden.
//!
//! The store is the single owner of the protected-channel set, the
//! monitored-admin set and the feature flags. Every other component reads
//! through [`ConfigStore`] and requests mutations through it; nobody keeps a
//! private copy.
//!
//! # Architecture
//!
//! - [`GuardConfig`] - the persisted record
//! - [`ConfigStore`] - the contract (atomic mutations, flags, flush)
//! - [`ConfigPersistence`] - the durable medium behind a store
//! - [`PersistedConfigStore`] - in-memory authority + write-through persistence
//!
//! # Example
//!
//! ```no_run
//! use warden_core::{ChannelId, UserId};
//! use warden_store::{ConfigStore, JsonConfigStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonConfigStore::open_file("config.json").await?;
//! store.add_protected_channel(ChannelId(-100123)).await?;
//! store.add_monitored_admin(UserId(555)).await?;
//! assert!(store.is_monitored(UserId(555)));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod persistence;
mod store;

pub use config::GuardConfig;
pub use persistence::{ConfigPersistence, JsonFilePersistence, MemoryPersistence};
pub use store::{ConfigStore, JsonConfigStore, MemoryConfigStore, PersistedConfigStore};
