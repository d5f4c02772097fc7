//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the controller's base URL and the notification policy.
//!
//! Configuration is stored at `~/.config/latchkey/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "latchkey";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// How long a notification stays on screen before auto-dismissing.
/// Matches the device's bundled web UI.
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the controller, e.g. `http://door.local`
    pub device_url: Option<String>,
    /// Display label for the title bar
    pub device_name: Option<String>,
    /// Notification auto-dismiss delay in milliseconds
    #[serde(default = "default_notice_ttl_ms")]
    pub notice_ttl_ms: u64,
    /// When true (the default), a missing credential silently produces
    /// unauthenticated requests. When false, the UI requires a login
    /// before issuing any request.
    #[serde(default = "default_allow_anonymous")]
    pub allow_anonymous: bool,
}

fn default_notice_ttl_ms() -> u64 {
    DEFAULT_NOTICE_TTL_MS
}

fn default_allow_anonymous() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_url: None,
            device_name: None,
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
            allow_anonymous: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_for_missing_fields() {
        // A config written by an older version carries only the URL
        let config: Config = serde_json::from_str(r#"{"device_url":"http://door.local"}"#)
            .expect("config should parse");
        assert_eq!(config.device_url.as_deref(), Some("http://door.local"));
        assert_eq!(config.notice_ttl_ms, DEFAULT_NOTICE_TTL_MS);
        assert!(config.allow_anonymous);
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            device_url: Some("http://10.0.0.9".to_string()),
            device_name: Some("Workshop door".to_string()),
            notice_ttl_ms: 1500,
            allow_anonymous: false,
        };
        let json = serde_json::to_string(&config).expect("config should serialize");
        let back: Config = serde_json::from_str(&json).expect("config should parse");
        assert_eq!(back.device_url, config.device_url);
        assert_eq!(back.notice_ttl_ms, 1500);
        assert!(!back.allow_anonymous);
    }
}
