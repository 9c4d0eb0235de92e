//! Client configuration
//!
//! JSON file, every field optional:
//!
//! ```json
//! { "default_page_size": 10, "max_page_size": 10000,
//!   "default_max_versions": 1, "log_level": "warn" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ClientResult};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Access layer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Rows per page when the caller does not pick a size (default: 10)
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Largest page a caller may request (default: 10000)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Versions per column returned by reads and scans (default: 1)
    #[serde(default = "default_max_versions")]
    pub default_max_versions: usize,

    /// Minimum log severity: trace, info, warn, error, fatal (default: "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    10
}
fn default_max_page_size() -> usize {
    10_000
}
fn default_max_versions() -> usize {
    1
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_max_versions: default_max_versions(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json(&content)?;

        let source = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", source.as_str()), ("log_level", config.log_level.as_str())],
        );

        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ClientResult<Self> {
        let config: ClientConfig = serde_json::from_str(content)
            .map_err(|e| ClientError::config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field ranges and the log level name
    pub fn validate(&self) -> ClientResult<()> {
        if self.default_page_size == 0 {
            return Err(ClientError::config("default_page_size must be > 0"));
        }

        if self.max_page_size == 0 {
            return Err(ClientError::config("max_page_size must be > 0"));
        }

        if self.default_page_size > self.max_page_size {
            return Err(ClientError::config(format!(
                "default_page_size ({}) exceeds max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }

        if self.default_max_versions == 0 {
            return Err(ClientError::config("default_max_versions must be > 0"));
        }

        self.log_severity()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> ClientResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ClientError::config(format!("Invalid log_level: '{}'", self.log_level))
        })
    }

    /// Sets the logger's minimum severity to `log_level`.
    ///
    /// The threshold is process-wide: the last call wins for every
    /// connection in the process.
    pub fn apply_log_level(&self) -> ClientResult<Severity> {
        let severity = self.log_severity()?;
        Logger::set_min_severity(severity);
        Ok(severity)
    }

    /// Checks a caller-supplied page size against the configured ceiling
    pub fn check_page_size(&self, page_size: usize) -> ClientResult<()> {
        if page_size == 0 || page_size > self.max_page_size {
            return Err(ClientError::invalid_argument(format!(
                "page size {} outside 1..={}",
                page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 10_000);
        assert_eq!(config.default_max_versions, 1);
        assert_eq!(config.log_severity().unwrap(), Severity::Warn);
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        assert_eq!(ClientConfig::from_json("{}").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(ClientConfig::from_json(r#"{"default_page_size": 0}"#).is_err());
        assert!(
            ClientConfig::from_json(r#"{"default_page_size": 50, "max_page_size": 20}"#).is_err()
        );
        assert!(ClientConfig::from_json(r#"{"default_max_versions": 0}"#).is_err());
        assert!(ClientConfig::from_json(r#"{"log_level": "loud"}"#).is_err());
        assert!(ClientConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_check_page_size() {
        let config = ClientConfig::default();
        assert!(config.check_page_size(1).is_ok());
        assert!(config.check_page_size(10_000).is_ok());
        assert!(config.check_page_size(0).is_err());
        assert!(config.check_page_size(10_001).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_page_size": 25, "log_level": "error"}}"#).unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.log_severity().unwrap(), Severity::Error);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), "WIDECOL_CONFIG");
    }
}
