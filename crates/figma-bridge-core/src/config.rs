use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::remote::Credentials;

pub const DEFAULT_API_BASE_URL: &str = "https://api.figma.com/v1";

/// Execution mode. Development mode dumps raw and simplified payloads to `dump_dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Production,
    Development,
}

impl RunMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(RunMode::Production),
            "development" | "dev" => Some(RunMode::Development),
            _ => None,
        }
    }
}

/// Global configuration loaded from `~/.config/figma-bridge/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the Figma REST API (no trailing slash).
    pub api_base_url: String,
    /// Personal access token, sent as `X-Figma-Token`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// OAuth access token, sent as `Authorization: Bearer`. Wins over `api_key` when both are set.
    #[serde(default)]
    pub oauth_token: Option<String>,
    #[serde(default)]
    pub mode: RunMode,
    /// Directory for development-mode payload dumps.
    pub dump_dir: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            oauth_token: None,
            mode: RunMode::Production,
            dump_dir: PathBuf::from("logs"),
        }
    }
}

impl BridgeConfig {
    /// Apply `FIGMA_API_KEY`, `FIGMA_OAUTH_TOKEN` and `FIGMA_BRIDGE_MODE` from the environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("FIGMA_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(token) = lookup("FIGMA_OAUTH_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.oauth_token = Some(token);
        }
        if let Some(raw) = lookup("FIGMA_BRIDGE_MODE") {
            match RunMode::parse(&raw) {
                Some(mode) => self.mode = mode,
                None => tracing::warn!("ignoring unknown FIGMA_BRIDGE_MODE value {:?}", raw),
            }
        }
    }

    /// Credentials for the remote client. OAuth token first, then API key.
    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(token) = self.oauth_token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(Credentials::OAuth(token.trim().to_string()));
        }
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(Credentials::ApiKey(key.trim().to_string()));
        }
        anyhow::bail!(
            "no Figma credentials configured; set FIGMA_API_KEY, pass --figma-api-key, or add api_key to {}",
            config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "config.toml".to_string())
        )
    }

    /// Directory for payload dumps, or `None` outside development mode.
    pub fn dump_dir(&self) -> Option<PathBuf> {
        match self.mode {
            RunMode::Development => Some(self.dump_dir.clone()),
            RunMode::Production => None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("figma-bridge")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BridgeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BridgeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: BridgeConfig = toml::from_str(&data)?;
    Ok(cfg)
}
