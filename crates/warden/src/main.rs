//! Warden CLI binary.
//!
//! - Run the guard against the Bot API
//! - Inspect and edit the guard configuration offline
//! - Read and prune the audit log

use clap::Parser;
use warden::{WardenSettings, init_telemetry, shutdown_telemetry};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use cli::{Cli, Commands, handle_logs_command, handle_store_command, run_server, show_settings};

    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut settings = WardenSettings::load(cli.settings.as_deref())?;
    if cli.verbose {
        settings.logging.level = "debug".to_string();
    }
    init_telemetry(&settings.logging)?;

    let result = match cli.command {
        Commands::Run => run_server(settings).await,
        Commands::Store(cmd) => handle_store_command(cmd, &settings).await,
        Commands::Logs(cmd) => handle_logs_command(cmd, &settings).await,
        Commands::Settings => show_settings(&settings),
    };

    shutdown_telemetry();
    result?;
    Ok(())
}
