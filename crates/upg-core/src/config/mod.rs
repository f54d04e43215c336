//! Configuration management for the UPG viewer.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `upg.toml` file
//! 3. User config `~/.config/upg/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where analysis data comes from.
    pub data: DataConfig,

    /// Viewer server configuration.
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./upg.toml` (project local)
    /// 2. `~/.config/upg/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Data overrides
        if let Some(url) = var("UPG_DATA_URL") {
            self.data.base_url = url;
        }
        if let Some(url) = var("UPG_NAVI_URL") {
            self.data.navi_url = Some(url);
        }
        if let Some(dir) = var("UPG_DATA_DIR") {
            self.data.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(secs) = var("UPG_TIMEOUT_SECS") {
            if let Ok(n) = secs.parse() {
                self.data.timeout_secs = n;
            }
        }

        // Server overrides
        if let Some(port) = var("UPG_PORT") {
            if let Ok(n) = port.parse() {
                self.server.port = n;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.base_url.trim().is_empty() && self.data.data_dir.is_none() {
            return Err(ConfigError::Invalid(
                "data.base_url is empty and no data.data_dir is set".to_string(),
            ));
        }
        if self.data.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "data.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root URL of the published data.
    pub base_url: String,

    /// Full navigation URL. Derived from `base_url` when unset.
    pub navi_url: Option<String>,

    /// Navigation document path under the data root.
    pub navi_path: String,

    /// Function documents directory under the data root.
    pub function_dir: String,

    /// Local data directory. Takes precedence over the remote host.
    pub data_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DATA_URL.to_string(),
            navi_url: None,
            navi_path: DEFAULT_NAVI_PATH.to_string(),
            function_dir: DEFAULT_FUNCTION_DIR.to_string(),
            data_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DataConfig {
    /// Get the navigation URL, falling back to `base_url` + `navi_path`.
    pub fn navi_url_or_default(&self) -> String {
        self.navi_url
            .clone()
            .unwrap_or_else(|| join_url(&self.base_url, &self.navi_path))
    }

    /// URL of the directory holding function documents.
    pub fn function_base_url(&self) -> String {
        join_url(&self.base_url, &self.function_dir)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Viewer server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Whether to open the browser automatically.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            open_browser: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_navi_url() {
        let config = Config::default();
        assert_eq!(config.data.navi_url_or_default(), NAVI_URL);
        assert_eq!(
            config.data.function_base_url(),
            format!("{DEFAULT_DATA_URL}/function")
        );
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("UPG_DATA_URL", "http://localhost:8000/data/"),
            ("UPG_TIMEOUT_SECS", "5"),
            ("UPG_PORT", "not-a-port"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data.navi_url_or_default(), "http://localhost:8000/data/navi/navi.json");
        assert_eq!(config.data.timeout(), Duration::from_secs(5));
        // Unparseable values are ignored.
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_explicit_navi_url_wins() {
        let mut config = DataConfig::default();
        config.navi_url = Some("http://example.org/n.json".to_string());
        assert_eq!(config.navi_url_or_default(), "http://example.org/n.json");
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.data.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
