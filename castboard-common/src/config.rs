//! Configuration loading
//!
//! Resolution order for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment values arrive together as
//! [`ConfigOverrides`] (clap resolves flag-over-env); this module handles
//! locating and parsing the TOML file and layering the overrides on top.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::plot::PlotArea;
use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CASTBOARD_CONFIG";

/// Default broadcast sync timeout (seconds)
pub const DEFAULT_BROADCAST_TIMEOUT_SECS: u64 = 5;
/// Default search timeout (seconds)
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 5780;

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    pub plot: PlotArea,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Remote data providers. Without a URL the local sample data is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub broadcast_sync_url: Option<String>,
    pub search_url: Option<String>,
    pub broadcast_timeout_secs: u64,
    pub search_timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            broadcast_sync_url: None,
            search_url: None,
            broadcast_timeout_secs: DEFAULT_BROADCAST_TIMEOUT_SECS,
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub broadcast_sync_url: Option<String>,
    pub search_url: Option<String>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Layer command-line/environment values over the file values
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(url) = overrides.broadcast_sync_url {
            self.sources.broadcast_sync_url = Some(url);
        }
        if let Some(url) = overrides.search_url {
            self.sources.search_url = Some(url);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Default config file location: `<config dir>/castboard/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("castboard").join("config.toml"))
}

/// Pick the config file: CLI path, then [`CONFIG_ENV_VAR`], then the
/// platform default. Returns whether the path was explicitly requested.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<(PathBuf, bool)> {
    if let Some(path) = cli_path {
        return Some((path.to_path_buf(), true));
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), true));
        }
    }
    default_config_path().map(|p| (p, false))
}

/// Parse a config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file, falling back to defaults when no file exists.
///
/// A missing default file is normal and only logged. A missing file that
/// was explicitly requested, or any file that fails to parse, is an error.
pub fn load_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    let Some((path, explicit)) = resolve_config_path(cli_path) else {
        warn!("Could not determine config directory, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        if explicit {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        info!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let config = read_toml_config(&path)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
