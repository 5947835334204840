//! Process settings.
//!
//! Settings are layered with the `config` crate:
//! - bundled defaults (`warden.default.toml`, compiled in)
//! - `./warden.toml`, or the file given with `--settings`
//! - `WARDEN__SECTION__KEY` environment variables
//!
//! Later layers win. The bot token is never stored in a file; the settings
//! only name the environment variable that holds it.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use warden_core::{BanPolicy, TelemetryConfig};
use warden_error::{ConfigError, WardenResult};

/// Longest accepted audit retention, in days.
pub const MAX_AUDIT_RETENTION_DAYS: i64 = 36_500;

/// Bundled defaults.
pub const DEFAULT_SETTINGS: &str = include_str!("../warden.default.toml");

/// Bot API connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramSettings {
    /// Base URL of the Bot API
    pub api_base: String,
    /// Name of the environment variable holding the bot token
    pub token_env: String,
    /// Long-poll timeout for `getUpdates`, in seconds
    pub poll_timeout_secs: u64,
    /// Outbound call budget
    pub api_calls_per_minute: u32,
    /// Pause after a failed poll, in seconds
    pub error_backoff_secs: u64,
}

impl TelegramSettings {
    /// Pause after a failed poll.
    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }
}

/// On-disk locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Guard configuration document
    pub config_path: PathBuf,
    /// Audit log (JSON lines)
    pub audit_log_path: PathBuf,
    /// Audit entries older than this many days are pruned at startup
    pub audit_retention_days: i64,
}

/// Health and metrics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSettings {
    /// Serve the endpoint at all
    pub enabled: bool,
    /// Listen address, `host:port`
    pub bind: String,
}

impl HealthSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns error if `bind` is not a socket address.
    pub fn bind_addr(&self) -> WardenResult<SocketAddr> {
        self.bind.parse().map_err(|e| {
            ConfigError::new(format!("Invalid health bind address '{}': {}", self.bind, e)).into()
        })
    }
}

/// Everything the process reads at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardenSettings {
    /// Bot API connection
    pub telegram: TelegramSettings,
    /// File locations
    pub storage: StorageSettings,
    /// Ban classification policy
    pub policy: BanPolicy,
    /// Health endpoint
    pub health: HealthSettings,
    /// Tracing output
    pub logging: TelemetryConfig,
}

impl WardenSettings {
    /// Load settings from the defaults, a settings file and the process
    /// environment.
    ///
    /// With `path`, that file must exist. Without it, `./warden.toml` is read
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns error if a source cannot be read or the merged result does not
    /// deserialize.
    #[instrument]
    pub fn load(path: Option<&Path>) -> WardenResult<Self> {
        Self::build(path, environment())
    }

    /// Like [`load`](Self::load), reading `WARDEN__*` variables from `vars`
    /// instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns error if a source cannot be read or the merged result does not
    /// deserialize.
    pub fn load_with_env(
        path: Option<&Path>,
        vars: HashMap<String, String>,
    ) -> WardenResult<Self> {
        Self::build(path, environment().source(Some(vars)))
    }

    fn build(path: Option<&Path>, env: Environment) -> WardenResult<Self> {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));
        let builder = match path {
            Some(path) => {
                debug!(path = %path.display(), "Reading settings file");
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name("warden").required(false)),
        };

        let settings: Self = builder
            .add_source(env)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load settings: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> WardenResult<()> {
        if self.telegram.api_calls_per_minute == 0 {
            return Err(ConfigError::new("telegram.api_calls_per_minute must be at least 1").into());
        }
        let retention = self.storage.audit_retention_days;
        if !(1..=MAX_AUDIT_RETENTION_DAYS).contains(&retention) {
            return Err(ConfigError::new(format!(
                "storage.audit_retention_days must be between 1 and {}",
                MAX_AUDIT_RETENTION_DAYS
            ))
            .into());
        }
        if self.health.enabled {
            self.health.bind_addr()?;
        }
        Ok(())
    }

    /// Read the bot token from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns error if the variable is unset or empty.
    pub fn bot_token(&self) -> WardenResult<String> {
        match std::env::var(&self.telegram.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ConfigError::new(format!(
                "Bot token not found: set {}",
                self.telegram.token_env
            ))
            .into()),
        }
    }

    /// Effective settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> WardenResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render settings: {}", e)).into())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("WARDEN")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_parse() {
        let settings = WardenSettings::load_with_env(None, HashMap::new()).expect("defaults load");

        assert_eq!(settings.telegram.token_env, "TELEGRAM_BOT_TOKEN");
        assert_eq!(settings.telegram.api_calls_per_minute, 30);
        assert_eq!(settings.storage.audit_retention_days, 30);
        assert!(!settings.policy.count_left_as_ban);
        assert!(settings.health.enabled);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_bad_bind_is_rejected() {
        let health = HealthSettings {
            enabled: true,
            bind: "not-an-address".to_string(),
        };
        assert!(health.bind_addr().is_err());
    }
}
