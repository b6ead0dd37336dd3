//! Server configuration.
//!
//! Loads settings from a `lode.toml` file next to the binary (or a path
//! given on the command line). Missing file means defaults; a present but
//! invalid file is an error.
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8181
//!
//! [log]
//! format = "json"
//! level = "info"
//! ```

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::Level;

use crate::logging::{LogConfig, LogFormat};

/// Default configuration file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lode.toml";

/// Server configuration loaded from `lode.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listener settings.
    pub server: ServerSettings,
    /// Logging settings.
    pub log: LogSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind.
    pub host: String,
    /// Port for the HTTP API.
    pub port: u16,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Output format: "pretty", "json", or "compact".
    pub format: String,
    /// Minimum level: "trace" through "error".
    pub level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8181,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: "pretty".to_string(),
            level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the given path, or from `lode.toml` in the
    /// working directory when no path is given.
    ///
    /// An explicitly given path must exist; the default path may be absent,
    /// in which case defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), false),
        };

        if !path.exists() {
            if required {
                bail!("config file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the logging settings into a [`LogConfig`].
    ///
    /// Fails when the format or level string is not recognized.
    pub fn log_config(&self) -> Result<LogConfig> {
        let format = LogFormat::from_str(&self.log.format)
            .map_err(|e| anyhow::anyhow!("invalid [log] format: {e}"))?;
        let level = Level::from_str(&self.log.level)
            .with_context(|| format!("invalid [log] level: {}", self.log.level))?;
        Ok(LogConfig { format, level })
    }
}
