//! Client configuration.
//!
//! Defaults, then the JSON config file under the user config dir, then
//! environment overrides — in that order of precedence (last wins). On
//! first run the defaults are written to disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The hosted backend the client talks to unless told otherwise.
pub const DEFAULT_API_URL: &str = "https://irs-assistant-api.azurewebsites.net";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_url")]
    pub api_base_url: String,
    #[serde(default = "default_demo_mode")]
    pub demo_mode: bool,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_demo_mode() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            demo_mode: default_demo_mode(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("taxchat"))
}

fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the effective configuration: file if present, defaults otherwise,
/// with environment variables applied on top. A missing file is written
/// with the defaults so there is something to edit.
pub fn load() -> eyre::Result<AppConfig> {
    let path = config_path()?;
    let mut config = if path.exists() {
        load_from(&path)?
    } else {
        let config = AppConfig::default();
        save(&config)?;
        config
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

pub fn load_from(path: &Path) -> eyre::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn save(config: &AppConfig) -> eyre::Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;
    save_to(&dir.join("config.json"), config)
}

pub fn save_to(path: &Path, config: &AppConfig) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(config)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Apply `TAXCHAT_API_URL`, `TAXCHAT_DEMO_MODE`, and `TAXCHAT_TIMEOUT_SECS`
/// on top of whatever the file provided.
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(url) = std::env::var("TAXCHAT_API_URL") {
        if !url.is_empty() {
            config.api_base_url = url;
        }
    }
    if let Ok(demo) = std::env::var("TAXCHAT_DEMO_MODE") {
        config.demo_mode = matches!(demo.as_str(), "1" | "true" | "yes" | "on");
    }
    if let Ok(timeout) = std::env::var("TAXCHAT_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.request_timeout_secs = secs;
        }
    }
}
