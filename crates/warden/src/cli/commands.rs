//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use warden::{ChannelId, UserId};

/// Warden - demotes and bans channel admins who abuse their ban rights
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(about = "Demotes and bans channel admins who abuse their ban rights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to ./warden.toml when present)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the guard until Ctrl-C
    Run,

    /// Inspect or edit the guard configuration
    #[command(subcommand)]
    Store(StoreCommands),

    /// Read or prune the audit log
    #[command(subcommand)]
    Logs(LogCommands),

    /// Print the effective settings as TOML
    Settings,
}

/// Guard configuration subcommands
#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// Print the stored configuration
    Show,

    /// Put a channel under protection
    AddChannel {
        /// Channel ID (e.g. -100123)
        #[arg(allow_negative_numbers = true)]
        channel: ChannelId,
    },

    /// Take a channel out of protection
    RemoveChannel {
        /// Channel ID
        #[arg(allow_negative_numbers = true)]
        channel: ChannelId,
    },

    /// Watch an admin
    AddAdmin {
        /// User ID
        user: UserId,
    },

    /// Stop watching an admin
    RemoveAdmin {
        /// User ID
        user: UserId,
    },

    /// Switch automatic remediation
    AutoBan {
        /// New state
        state: Switch,
    },

    /// Switch channel notifications
    Notifications {
        /// New state
        state: Switch,
    },
}

/// Audit log subcommands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Print recent entries as JSON lines, oldest first
    Show {
        /// Maximum number of entries
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Only entries with this action (e.g. admin_banned_for_abuse)
        #[arg(long)]
        action: Option<String>,

        /// Only entries naming this admin
        #[arg(long)]
        admin: Option<UserId>,
    },

    /// Drop entries older than the retention window
    Prune {
        /// Retention in days (defaults to storage.audit_retention_days)
        #[arg(long)]
        days: Option<i64>,
    },
}

/// On/off switch value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    /// Enable
    On,
    /// Disable
    Off,
}

impl Switch {
    /// Switch as a flag value.
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}
