//! Application settings and configuration

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use trading_common::error::ConfigurationError;

use crate::provider::quiver::ReadErrorPolicy;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Data folder settings
    #[serde(default)]
    pub storage: StorageSettings,
    /// Data file reader settings
    #[serde(default)]
    pub reader: ReaderSettings,
}

/// Data folder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Root of the data folder that dataset paths are built under
    #[serde(default = "default_data_folder")]
    pub data_folder: PathBuf,
}

fn default_data_folder() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_folder: default_data_folder(),
        }
    }
}

/// How the reader reacts to lines that fail to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicyKind {
    /// Log and skip bad lines
    #[default]
    Skip,
    /// Stop at the first bad line
    Abort,
}

/// Data file reader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderSettings {
    /// Reaction to lines that fail to decode
    #[serde(default)]
    pub error_policy: ErrorPolicyKind,
    /// Consecutive failures tolerated under the skip policy
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: usize,
}

fn default_max_consecutive_errors() -> usize {
    100
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicyKind::default(),
            max_consecutive_errors: default_max_consecutive_errors(),
        }
    }
}

impl ReaderSettings {
    /// Reader policy described by these settings
    pub fn policy(&self) -> ReadErrorPolicy {
        match self.error_policy {
            ErrorPolicyKind::Abort => ReadErrorPolicy::Abort,
            ErrorPolicyKind::Skip => ReadErrorPolicy::Skip {
                max_consecutive: self.max_consecutive_errors,
            },
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_prefix("DATA_MANAGER")
    }

    /// Load settings with a custom environment variable prefix
    pub fn load_with_prefix(env_prefix: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config_dir = Self::config_dir();

        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Local overrides (not checked into git)
            .add_source(File::with_name(&format!("{}/local", config_dir)).required(false))
            // e.g. DATA_MANAGER__STORAGE__DATA_FOLDER
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    /// Get the configuration directory path
    fn config_dir() -> String {
        std::env::var("DATA_MANAGER_CONFIG_DIR").unwrap_or_else(|_| "config".into())
    }

    /// Create default settings (useful for testing)
    pub fn default_settings() -> Self {
        Settings {
            storage: StorageSettings::default(),
            reader: ReaderSettings::default(),
        }
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.storage.data_folder.as_os_str().is_empty() {
            return Err(ConfigurationError::MissingField(
                "storage.data_folder".to_string(),
            ));
        }

        if self.reader.error_policy == ErrorPolicyKind::Skip
            && self.reader.max_consecutive_errors == 0
        {
            return Err(ConfigurationError::invalid(
                "reader.max_consecutive_errors",
                "must be at least 1 when the error policy is 'skip'",
            ));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::default_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default_settings();
        assert_eq!(settings.storage.data_folder, PathBuf::from("./data"));
        assert_eq!(
            settings.reader.policy(),
            ReadErrorPolicy::Skip {
                max_consecutive: 100
            }
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("WIKI_SETTINGS_TEST__STORAGE__DATA_FOLDER", "/srv/quiver");
        std::env::set_var("WIKI_SETTINGS_TEST__READER__ERROR_POLICY", "abort");

        let settings = Settings::load_with_prefix("WIKI_SETTINGS_TEST").unwrap();
        assert_eq!(settings.storage.data_folder, PathBuf::from("/srv/quiver"));
        assert_eq!(settings.reader.policy(), ReadErrorPolicy::Abort);
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut settings = Settings::default_settings();
        settings.reader.max_consecutive_errors = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigurationError::InvalidValue { .. })
        ));

        // Zero is irrelevant when aborting
        settings.reader.error_policy = ErrorPolicyKind::Abort;
        assert!(settings.validate().is_ok());

        settings.storage.data_folder = PathBuf::new();
        assert!(matches!(
            settings.validate(),
            Err(ConfigurationError::MissingField(_))
        ));
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: Settings =
            serde_json::from_str(r#"{"reader": {"error_policy": "abort"}}"#).unwrap();
        assert_eq!(settings.storage.data_folder, PathBuf::from("./data"));
        assert_eq!(settings.reader.max_consecutive_errors, 100);
        assert_eq!(settings.reader.policy(), ReadErrorPolicy::Abort);
    }
}
