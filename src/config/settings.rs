//! Settings structures for npms-rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub net: NetSettings,
    pub search: SearchSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (NPMS_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("NPMS_LOG_LEVEL") {
            self.general.log_level = val;
        }
        if let Ok(val) = std::env::var("NPMS_API_URL") {
            self.net.npm_api_url = val;
        }
        if let Ok(val) = std::env::var("NPMS_REQUEST_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.net.request_timeout_ms = timeout;
            }
        }
        if let Ok(val) = std::env::var("NPMS_DEBOUNCE_MS") {
            if let Ok(debounce) = val.parse() {
                self.search.debounce_ms = debounce;
            }
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level: "error", "debug" or "off"
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "error".to_string(),
        }
    }
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetSettings {
    /// npms.io API base URL
    pub npm_api_url: String,
    /// Default request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl NetSettings {
    /// Default request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for NetSettings {
    fn default() -> Self {
        Self {
            npm_api_url: "https://api.npms.io/v2".to_string(),
            request_timeout_ms: crate::DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Debounce delay for search input in milliseconds
    pub debounce_ms: u64,
}

impl SearchSettings {
    /// Debounce delay as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Persisted UI state settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Fixed key the UI state snapshot is stored under
    pub state_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            state_key: "state".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.general.log_level, "error");
        assert_eq!(settings.net.npm_api_url, "https://api.npms.io/v2");
        assert_eq!(settings.net.request_timeout_ms, 10_000);
        assert_eq!(settings.search.debounce_ms, 500);
        assert_eq!(settings.storage.state_key, "state");
    }

    #[test]
    fn test_duration_accessors() {
        let settings = Settings::default();
        assert_eq!(settings.net.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.search.debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
net:
  npm_api_url: "http://localhost:9200/v2"
search:
  debounce_ms: 250
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.net.npm_api_url, "http://localhost:9200/v2");
        assert_eq!(settings.net.request_timeout_ms, 10_000);
        assert_eq!(settings.search.debounce_ms, 250);
        assert_eq!(settings.general.log_level, "error");
    }

    #[test]
    fn test_merge_env() {
        let mut settings = Settings::default();
        std::env::set_var("NPMS_API_URL", "http://127.0.0.1:8080/v2");
        std::env::set_var("NPMS_REQUEST_TIMEOUT_MS", "2500");
        settings.merge_env();
        std::env::remove_var("NPMS_API_URL");
        std::env::remove_var("NPMS_REQUEST_TIMEOUT_MS");

        assert_eq!(settings.net.npm_api_url, "http://127.0.0.1:8080/v2");
        assert_eq!(settings.net.request_timeout_ms, 2500);
    }
}
