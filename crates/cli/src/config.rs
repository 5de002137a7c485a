//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHIELDSYNC_CATALOG` - Path to a YAML product catalog (default: built-in plans)
//! - `SHIELDSYNC_NOTIFICATIONS` - `terminal`, `log` or `off` (default: terminal)
//! - `SHIELDSYNC_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `RUST_LOG` - Tracing filter (default: `shieldsync_cli=info,shieldsync_core=info`)
//!
//! Command-line flags take precedence over all of these.

use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where cart notifications are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NotificationMode {
    /// Toast lines on stderr
    #[default]
    Terminal,
    /// Tracing events
    Log,
    /// Nowhere
    Off,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Custom catalog file; the built-in plans are used when unset
    pub catalog_path: Option<PathBuf>,
    /// Notification sink for cart sessions
    pub notifications: NotificationMode,
    /// Format of log lines on stderr
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable holds an unsupported value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            catalog_path: get("SHIELDSYNC_CATALOG").map(PathBuf::from),
            notifications: parse_choice("SHIELDSYNC_NOTIFICATIONS", get("SHIELDSYNC_NOTIFICATIONS"))?
                .unwrap_or_default(),
            log_format: parse_choice("SHIELDSYNC_LOG_FORMAT", get("SHIELDSYNC_LOG_FORMAT"))?
                .unwrap_or_default(),
        })
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(
        mut self,
        catalog_path: Option<PathBuf>,
        notifications: Option<NotificationMode>,
        log_format: Option<LogFormat>,
    ) -> Self {
        if catalog_path.is_some() {
            self.catalog_path = catalog_path;
        }
        if let Some(notifications) = notifications {
            self.notifications = notifications;
        }
        if let Some(log_format) = log_format {
            self.log_format = log_format;
        }
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional value against the names clap accepts for the same enum.
fn parse_choice<T: ValueEnum>(key: &str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            T::from_str(value.trim(), true)
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.notifications, NotificationMode::Terminal);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = load(&[
            ("SHIELDSYNC_CATALOG", "/etc/shieldsync/catalog.yaml"),
            ("SHIELDSYNC_NOTIFICATIONS", "log"),
            ("SHIELDSYNC_LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/shieldsync/catalog.yaml"))
        );
        assert_eq!(config.notifications, NotificationMode::Log);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = load(&[("SHIELDSYNC_CATALOG", "  "), ("SHIELDSYNC_NOTIFICATIONS", "")]).unwrap();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.notifications, NotificationMode::Terminal);
    }

    #[test]
    fn test_invalid_choice() {
        let result = load(&[("SHIELDSYNC_NOTIFICATIONS", "popup")]);
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHIELDSYNC_NOTIFICATIONS"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = load(&[("SHIELDSYNC_NOTIFICATIONS", "log")])
            .unwrap()
            .with_overrides(
                Some(PathBuf::from("plans.yaml")),
                Some(NotificationMode::Off),
                None,
            );

        assert_eq!(config.catalog_path, Some(PathBuf::from("plans.yaml")));
        assert_eq!(config.notifications, NotificationMode::Off);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
