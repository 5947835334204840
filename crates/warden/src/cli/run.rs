//! Server and settings command handlers.

use warden::{ConfigError, WardenResult, WardenServer, WardenSettings};

/// Run the guard until shutdown.
pub async fn run_server(settings: WardenSettings) -> WardenResult<()> {
    WardenServer::new(settings).run().await
}

/// Print the effective settings.
pub fn show_settings(settings: &WardenSettings) -> WardenResult<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}

pub(super) fn render_json<T: serde::Serialize>(value: &T, pretty: bool) -> WardenResult<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| ConfigError::new(format!("Failed to render JSON: {}", e)).into())
}
