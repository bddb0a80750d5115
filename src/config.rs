use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::calendar::WeekStart;
use crate::theme::ThemeConfig;

const APP_DIR: &str = "calgrid";
pub const DEFAULT_EVENTS_URL: &str = "http://localhost:3000/call/defaultEvents.json";

/// `~/.config/calgrid/config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `http(s)` URL or local path. An empty string disables the fetch.
    pub default_events_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub week_start: WeekStart,
    pub log_level: Option<String>,
    pub theme: ThemeConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let Some(path) = config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).wrap_err_with(|| format!("Invalid config in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_events_source(&self) -> Option<&str> {
        match self.default_events_url.as_deref() {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s.trim()),
            None => Some(DEFAULT_EVENTS_URL),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}
