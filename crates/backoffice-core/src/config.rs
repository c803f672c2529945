//! Configuration management for the backoffice console

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for entity collection endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for the authentication collaborator
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,

    /// Request timeout in seconds, enforced by the HTTP transport
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted session flag and theme keys
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://artisticify-backend.vercel.app".to_string()
}

fn default_auth_base_url() -> String {
    "https://artisticify-backend.vercel.app/api/users".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".backoffice")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_base_url: default_auth_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from an optional TOML file plus environment
    /// overrides (`BACKOFFICE_API__BASE_URL` style keys)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the file cannot be read or a
    /// value fails to deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("BACKOFFICE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(|e| Error::Configuration {
            message: e.to_string(),
        })?;

        settings
            .try_deserialize()
            .map_err(|e| Error::Configuration {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.api.base_url, "https://artisticify-backend.vercel.app");
        assert_eq!(
            config.api.auth_base_url,
            "https://artisticify-backend.vercel.app/api/users"
        );
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.state_dir, PathBuf::from(".backoffice"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = DashboardConfig::load(None).unwrap();
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "http://localhost:5000"
request_timeout_secs = 5

[session]
state_dir = "/tmp/panel-state"
"#
        )
        .unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.session.state_dir, PathBuf::from("/tmp/panel-state"));
        // Untouched sections keep their defaults.
        assert_eq!(
            config.api.auth_base_url,
            "https://artisticify-backend.vercel.app/api/users"
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = DashboardConfig::load(Some(Path::new("/nonexistent/backoffice.toml")));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = DashboardConfig::default();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: DashboardConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, config.api.base_url);
        assert_eq!(deserialized.session.state_dir, config.session.state_dir);
    }
}
