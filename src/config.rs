//! Runtime configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::display::{RenderConfig, DEFAULT_CAPACITY};
use crate::ui::Style;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "rogui.toml";

/// Configuration file structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum retained log entries (0 is treated as 1)
    pub scrollback_capacity: usize,
    /// Bold text on the header row
    pub header_text: String,
    /// Title on the body frame
    pub body_title: String,
    /// Title on the log frame
    pub log_title: String,
    /// Prefix log lines with local HH:MM:SS
    pub show_timestamps: bool,
    /// How often the input poller checks for externally appended entries
    pub poll_interval_ms: u64,
    /// Seconds between demo heartbeat entries (0 = off)
    pub heartbeat_secs: u64,
    /// Where tracing output goes; discarded when unset
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrollback_capacity: DEFAULT_CAPACITY,
            header_text: "hello curse.  Press q to quit. Resize the terminal.".to_string(),
            body_title: "status".to_string(),
            log_title: "log".to_string(),
            show_timestamps: false,
            poll_interval_ms: 250,
            heartbeat_secs: 0,
            log_file: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file, falling back to defaults if it's missing
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!(
            capacity = config.scrollback_capacity,
            "loaded config from {}",
            path.display()
        );

        Ok(config)
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render settings for the log region
    pub fn log_render_config(&self) -> RenderConfig {
        RenderConfig {
            title: self.log_title.clone(),
            show_timestamps: self.show_timestamps,
            border_style: Style::Plain,
        }
    }
}
