//! Application configuration
//!
//! TOML-backed settings for the CubeAI client, stored under the per-user
//! config directory. Environment variables (`CUBEAI_API_URL`,
//! `CUBEAI_API_KEY`) override the file where it matters.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// App version with build number, e.g. `0.3.1+14`
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
    #[serde(default)]
    pub holoocean: HoloOceanSettings,
}

fn default_version() -> String {
    format!("{}+1", env!("CARGO_PKG_VERSION"))
}

/// Remote service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    cubeai_chat::types::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Animation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationSettings {
    #[serde(default = "default_speed")]
    pub default_speed: f64,
}

fn default_speed() -> f64 {
    1.0
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            default_speed: default_speed(),
        }
    }
}

/// HoloOcean sidecar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoloOceanSettings {
    #[serde(default = "default_holoocean_url")]
    pub url: String,
}

fn default_holoocean_url() -> String {
    "ws://localhost:8765/ws/holoocean".to_string()
}

impl Default for HoloOceanSettings {
    fn default() -> Self {
        Self {
            url: default_holoocean_url(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            api: ApiSettings::default(),
            animation: AnimationSettings::default(),
            holoocean: HoloOceanSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or defaults when the file is
    /// missing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&content).context("failed to parse config")
    }

    /// Write configuration to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("failed to create config directory")?;
        }
        fs::write(path, content).context("failed to write config file")?;
        Ok(())
    }

    /// Default config path: `<config dir>/cubeai/cubeai.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("could not determine config directory")?;
        Ok(base.join("cubeai").join("cubeai.toml"))
    }

    /// Build the chat client configuration, letting environment
    /// variables override the file.
    pub fn chat_config(&self) -> cubeai_chat::ChatConfig {
        let base_url = std::env::var("CUBEAI_API_URL").unwrap_or_else(|_| self.api.base_url.clone());
        let api_key = std::env::var("CUBEAI_API_KEY")
            .ok()
            .or_else(|| self.api.api_key.clone())
            .filter(|k| !k.is_empty());
        let mut config = cubeai_chat::ChatConfig::new()
            .with_base_url(base_url)
            .with_timeout(std::time::Duration::from_secs(self.api.timeout_secs));
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        config
    }
}
