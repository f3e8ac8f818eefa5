//! # VELIXA CONFIGURATION
//!
//! **SOURCES**, later wins:
//! 1. Built-in defaults
//! 2. Optional JSON file
//! 3. `VELIXA_*` environment variables

use crate::errors::VelixaError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const INVALID_CONFIG: &str = "VELIXA_CONFIG_INVALID";
pub const INVALID_ENV: &str = "VELIXA_CONFIG_INVALID_ENV";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub default_duration_ms: u64,
    pub closable: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 5000,
            closable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    pub closable: bool,
    /// Dialogs left unanswered this long resolve negatively. Unset means
    /// they wait indefinitely.
    pub auto_dismiss_ms: Option<u64>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            closable: true,
            auto_dismiss_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_password_score: u8,
    pub username_min_length: usize,
    pub username_max_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_password_score: 2,
            username_min_length: 3,
            username_max_length: 32,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// File-backed session storage; in-memory when unset.
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelixaConfig {
    pub log_level: String,
    pub notifications: NotificationConfig,
    pub modals: ModalConfig,
    pub validation: ValidationConfig,
    pub session: SessionConfig,
}

impl Default for VelixaConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            notifications: NotificationConfig::default(),
            modals: ModalConfig::default(),
            validation: ValidationConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl VelixaConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VelixaError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            VelixaError::config(
                INVALID_CONFIG,
                format!("Cannot parse {}: {}", path.display(), e),
            )
        })
    }

    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, VelixaError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;
        Ok(config)
    }

    /// Applies recognised `VELIXA_*` variables; others are ignored.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<(), VelixaError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "VELIXA_LOG_LEVEL" => self.log_level = value,
                "VELIXA_NOTIFICATION_DURATION_MS" => {
                    self.notifications.default_duration_ms = parse_env(&key, &value)?
                }
                "VELIXA_NOTIFICATION_CLOSABLE" => {
                    self.notifications.closable = parse_env(&key, &value)?
                }
                "VELIXA_MODAL_AUTO_DISMISS_MS" => {
                    self.modals.auto_dismiss_ms = if value.trim().is_empty() {
                        None
                    } else {
                        Some(parse_env(&key, &value)?)
                    }
                }
                "VELIXA_MIN_PASSWORD_SCORE" => {
                    let score: u8 = parse_env(&key, &value)?;
                    if score > 5 {
                        return Err(VelixaError::config(
                            INVALID_ENV,
                            format!("{} must be between 0 and 5, got {}", key, score),
                        ));
                    }
                    self.validation.min_password_score = score;
                }
                "VELIXA_SESSION_PATH" => {
                    self.session.storage_path = if value.trim().is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(value))
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, VelixaError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        VelixaError::config(
            INVALID_ENV,
            format!("{} has invalid value '{}': {}", key, value, e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = VelixaConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.notifications.default_duration_ms, 5000);
        assert!(config.notifications.closable);
        assert!(config.modals.closable);
        assert_eq!(config.modals.auto_dismiss_ms, None);
        assert_eq!(config.validation.min_password_score, 2);
        assert!(config.session.storage_path.is_none());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"notifications": {{"default_duration_ms": 1500}}, "validation": {{"min_password_score": 4}}}}"#
        )
        .unwrap();

        let config = VelixaConfig::from_file(file.path()).unwrap();
        assert_eq!(config.notifications.default_duration_ms, 1500);
        assert!(config.notifications.closable);
        assert_eq!(config.validation.min_password_score, 4);
        assert_eq!(config.validation.username_min_length, 3);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        match VelixaConfig::from_file(file.path()) {
            Err(VelixaError::Config { code, .. }) => assert_eq!(code, INVALID_CONFIG),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_missing() {
        let result = VelixaConfig::from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(VelixaError::Io(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = VelixaConfig::default();
        config
            .apply_env(vars(&[
                ("VELIXA_LOG_LEVEL", "debug"),
                ("VELIXA_NOTIFICATION_DURATION_MS", "0"),
                ("VELIXA_NOTIFICATION_CLOSABLE", "false"),
                ("VELIXA_MODAL_AUTO_DISMISS_MS", "30000"),
                ("VELIXA_MIN_PASSWORD_SCORE", "3"),
                ("VELIXA_SESSION_PATH", "/tmp/velixa-session.json"),
                ("PATH", "/usr/bin"),
            ]))
            .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.notifications.default_duration_ms, 0);
        assert!(!config.notifications.closable);
        assert_eq!(config.modals.auto_dismiss_ms, Some(30000));
        assert_eq!(config.validation.min_password_score, 3);
        assert_eq!(
            config.session.storage_path,
            Some(PathBuf::from("/tmp/velixa-session.json"))
        );
    }

    #[test]
    fn test_env_invalid_number() {
        let mut config = VelixaConfig::default();
        let result = config.apply_env(vars(&[("VELIXA_NOTIFICATION_DURATION_MS", "soon")]));
        match result {
            Err(VelixaError::Config { code, message }) => {
                assert_eq!(code, INVALID_ENV);
                assert!(message.contains("VELIXA_NOTIFICATION_DURATION_MS"));
            }
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_score_out_of_range() {
        let mut config = VelixaConfig::default();
        let result = config.apply_env(vars(&[("VELIXA_MIN_PASSWORD_SCORE", "6")]));
        assert!(matches!(result, Err(VelixaError::Config { .. })));
    }
}
