// Configuration handling for the jukebox
//
// The configuration file is JSON. Player settings live in a "players"
// subtree; a top-level "mpd" section from older files is still accepted.

use std::fs;
use std::path::Path;
use std::time::Duration;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::helpers::retry::RetryPolicy;
use crate::logging::LoggingConfig;
use crate::players::ReconcilerConfig;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Helper function to get player configuration with backward compatibility
///
/// This function first tries to find the player in the "players" structure,
/// then falls back to the old top-level structure.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use jukebox::config::get_player_config;
///
/// let config = json!({
///   "players": {
///     "mpd": { "port": 6601 }
///   }
/// });
/// assert_eq!(get_player_config(&config, "mpd").unwrap()["port"], 6601);
///
/// let old_config = json!({ "mpd": { "port": 6602 } });
/// assert_eq!(get_player_config(&old_config, "mpd").unwrap()["port"], 6602);
/// ```
pub fn get_player_config<'a>(config: &'a serde_json::Value, player_name: &str) -> Option<&'a serde_json::Value> {
    if let Some(player_config) = config.get("players").and_then(|p| p.get(player_name)) {
        debug!("Found {} configuration in players section", player_name);
        return Some(player_config);
    }

    if let Some(player_config) = config.get(player_name) {
        debug!("Found {} configuration at top level (legacy structure)", player_name);
        return Some(player_config);
    }

    debug!("No {} configuration found in either players section or top level", player_name);
    None
}

/// Connection and polling settings for the MPD daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpdConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Minimum time between two status polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6600
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for MpdConfig {
    fn default() -> Self {
        MpdConfig {
            host: default_host(),
            port: default_port(),
            poll_interval_ms: default_poll_interval_ms(),
            retry: RetryPolicy::default(),
        }
    }
}

impl MpdConfig {
    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            retry: self.retry.clone(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default)]
pub struct JukeboxConfig {
    pub mpd: MpdConfig,
    pub logging: Option<LoggingConfig>,
}

impl JukeboxConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let mpd = match get_player_config(value, "mpd") {
            Some(section) => MpdConfig::deserialize(section)?,
            None => MpdConfig::default(),
        };

        let logging = match value.get("logging") {
            Some(section) => Some(LoggingConfig::deserialize(section)?),
            None => None,
        };

        Ok(JukeboxConfig { mpd, logging })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_defaults_when_section_missing() {
        let config = JukeboxConfig::from_json("{}").unwrap();
        assert_eq!(config.mpd, MpdConfig::default());
        assert_eq!(config.mpd.port, 6600);
        assert!(config.logging.is_none());
    }

    #[test]
    fn test_players_section_wins_over_legacy() {
        let value = json!({
            "players": { "mpd": { "host": "jukebox.local" } },
            "mpd": { "host": "legacy.local" }
        });
        let config = JukeboxConfig::from_value(&value).unwrap();
        assert_eq!(config.mpd.host, "jukebox.local");
        assert_eq!(config.mpd.poll_interval_ms, 1000);
    }

    #[test]
    fn test_retry_and_interval() {
        let value = json!({
            "mpd": {
                "poll_interval_ms": 250,
                "retry": { "max_attempts": 0 }
            }
        });
        let config = JukeboxConfig::from_value(&value).unwrap();
        let reconciler = config.mpd.reconciler_config();
        assert_eq!(reconciler.poll_interval, Duration::from_millis(250));
        assert_eq!(reconciler.retry.max_attempts, 0);
        assert_eq!(reconciler.retry.initial_wait_ms, 100);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = JukeboxConfig::from_json(r#"{ "mpd": { "port": "sixty-six" } }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "players": {{ "mpd": {{ "port": 6601 }} }}, "logging": {{ "level": "debug" }} }}"#).unwrap();

        let config = JukeboxConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mpd.port, 6601);
        assert_eq!(config.logging.unwrap().level, "debug");
    }

    #[test]
    fn test_missing_file() {
        let result = JukeboxConfig::from_file("/nonexistent/jukebox.json");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
