use std::time::Duration;

use eyre::Result;
use tracing_subscriber::EnvFilter;

use taxchat_api::ApiClient;
use taxchat_tui::ui::App;
use taxchat_tui::{config, demo, new_shared_store};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let config = config::load()?;
    tracing::info!(api_base_url = %config.api_base_url, demo_mode = config.demo_mode, "starting");

    let api = ApiClient::with_timeout(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .map_err(|e| eyre::eyre!("failed to build API client: {e}"))?;

    let store = new_shared_store();
    if config.demo_mode {
        demo::seed(&store).await;
    }

    App::new(store, api).run().await
}

/// The TUI owns the terminal, so logs go to a file under the state
/// directory instead of stdout.
fn init_tracing() -> Result<()> {
    let dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .ok_or_else(|| eyre::eyre!("no state directory found"))?
        .join("taxchat");
    std::fs::create_dir_all(&dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("taxchat.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Ok(())
}
