//! Configuration management for the matchdesk admin console

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Bulk upload configuration
    #[serde(default)]
    pub upload: UploadConfig,

    /// Dashboard page configuration
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Admin backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the admin API, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as `X-API-Key`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Bulk upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Largest spreadsheet accepted, in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

/// Dashboard listing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Rows per page on list pages
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Users fetched to populate the swipe dialog pickers
    #[serde(default = "default_user_picker_size")]
    pub user_picker_size: u32,

    /// Entries shown in the recent activity feed
    #[serde(default = "default_activity_limit")]
    pub activity_limit: u32,

    /// Trailing window for the analytics chart, in days
    #[serde(default = "default_analytics_days")]
    pub analytics_days: u32,
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
    "http://localhost:3000".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

const fn default_page_size() -> u32 {
    20
}

const fn default_user_picker_size() -> u32 {
    100
}

const fn default_activity_limit() -> u32 {
    10
}

const fn default_analytics_days() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            user_picker_size: default_user_picker_size(),
            activity_limit: default_activity_limit(),
            analytics_days: default_analytics_days(),
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

impl Config {
    /// Load configuration from `matchdesk.toml` (if present) and `MATCHDESK_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::build(config::File::with_name("matchdesk").required(false))
    }

    /// Load configuration from an explicit file, still layered under the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the configuration cannot be parsed.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> crate::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("MATCHDESK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check values the serde defaults cannot guard
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first invalid value.
    pub fn validate(&self) -> crate::Result<()> {
        if self.service.base_url.is_empty() {
            return Err(crate::Error::Configuration {
                message: "service.base_url must not be empty".to_string(),
            });
        }
        if self.dashboard.page_size == 0 {
            return Err(crate::Error::Configuration {
                message: "dashboard.page_size must be positive".to_string(),
            });
        }
        if self.upload.max_file_size == 0 {
            return Err(crate::Error::Configuration {
                message: "upload.max_file_size must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.service.base_url, "http://localhost:3000");
        assert!(config.service.api_key.is_none());
        assert_eq!(config.service.request_timeout, 30);
        assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.dashboard.page_size, 20);
        assert_eq!(config.dashboard.user_picker_size, 100);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[service]\nbase_url = \"https://admin.example.com\"\napi_key = \"secret\"\n\n[dashboard]\npage_size = 50"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.service.base_url, "https://admin.example.com");
        assert_eq!(config.service.api_key.as_deref(), Some("secret"));
        assert_eq!(config.dashboard.page_size, 50);
        assert_eq!(config.dashboard.activity_limit, 10);
        assert_eq!(config.upload.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = Config::load_from(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = Config::default();
        config.dashboard.page_size = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_config_serialization_roundtrip_keeps_service() {
        let mut config = Config::default();
        config.service.api_key = Some("k".to_string());

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.service.api_key.as_deref(), Some("k"));
        assert_eq!(deserialized.dashboard.page_size, config.dashboard.page_size);
    }
}
