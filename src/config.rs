//! Configuration Management
//!
//! Connection settings for a Cachet installation. Values are layered:
//! config file, then environment variables, then explicit overrides (CLI).

use crate::error::{CachetError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_ENDPOINT: &str = "CACHET_ENDPOINT";
pub const ENV_API_TOKEN: &str = "CACHET_API_TOKEN";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClientConfig {
    /// API base, e.g. `https://status.example.com/api/v1`
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(endpoint: &str, api_token: &str) -> Self {
        Self {
            endpoint: Some(endpoint.to_string()),
            api_token: Some(api_token.to_string()),
            ..Default::default()
        }
    }

    /// Default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cachet").join("config.json"))
    }

    /// Load the default config file with environment overrides applied
    pub fn load() -> Self {
        let file = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        file.with_env()
    }

    /// Load configuration from a file; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| CachetError::Config("no config directory on this platform".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |e: std::io::Error| CachetError::Config(format!("cannot write {:?}: {}", path, e));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| CachetError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, content).map_err(io_err)?;

        Ok(())
    }

    /// Apply `CACHET_ENDPOINT` / `CACHET_API_TOKEN`
    pub fn with_env(self) -> Self {
        self.merge(Self {
            endpoint: std::env::var(ENV_ENDPOINT).ok(),
            api_token: std::env::var(ENV_API_TOKEN).ok(),
            ..Default::default()
        })
    }

    /// Fields set in `other` win
    pub fn merge(self, other: Self) -> Self {
        Self {
            endpoint: other.endpoint.or(self.endpoint),
            api_token: other.api_token.or(self.api_token),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            user_agent: other.user_agent.or(self.user_agent),
        }
    }

    pub fn endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| CachetError::Config(format!("no endpoint configured (set {})", ENV_ENDPOINT)))
    }

    pub fn api_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CachetError::Config(format!("no API token configured (set {})", ENV_API_TOKEN)))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(crate::http::DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let file = ClientConfig {
            endpoint: Some("http://file/api/v1".into()),
            api_token: Some("file-token".into()),
            timeout_secs: Some(10),
            user_agent: None,
        };
        let cli = ClientConfig {
            api_token: Some("cli-token".into()),
            ..Default::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.endpoint.as_deref(), Some("http://file/api/v1"));
        assert_eq!(merged.api_token.as_deref(), Some("cli-token"));
        assert_eq!(merged.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_values_are_config_errors() {
        let config = ClientConfig {
            endpoint: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(config.endpoint(), Err(CachetError::Config(_))));
        assert!(matches!(config.api_token(), Err(CachetError::Config(_))));
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let config = ClientConfig::load_from(Path::new("/nonexistent/cachet/config.json"));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("cachet-config-test-{}", std::process::id()))
            .join("config.json");
        let config = ClientConfig::new("http://x/api/v1", "token");

        config.save_to(&path).unwrap();
        assert_eq!(ClientConfig::load_from(&path), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_parse_config_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"endpoint": "http://x/api/v1", "timeout_secs": 5}"#).unwrap();
        assert_eq!(config.endpoint().unwrap(), "http://x/api/v1");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.api_token.is_none());
    }
}
