use crate::api::TrendWindow;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const CONFIG_DIR: &str = "skypulse";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    pub trending: TrendingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many recent posts the feed asks for
    pub post_limit: usize,
    /// Window used by the hashtag side panel
    pub trending_days: TrendWindow,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            post_limit: 50,
            trending_days: TrendWindow::Week,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub default_window: TrendWindow,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            default_window: TrendWindow::Week,
        }
    }
}

impl Config {
    /// Location of the user config file, e.g. `~/.config/skypulse/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one the default location is
    /// tried and a missing file falls back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply a base URL given on the command line or through the environment.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Result<Self> {
        if let Some(url) = api_url {
            self.api.base_url = url;
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            );
        }
        if self.dashboard.post_limit == 0 {
            bail!("dashboard.post_limit must be at least 1");
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be at least 1");
        }
        Ok(())
    }
}
