//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the warden binary.

mod commands;
mod logs;
mod run;
mod store;

pub use commands::{Cli, Commands};
pub use logs::handle_logs_command;
pub use run::{run_server, show_settings};
pub use store::handle_store_command;
