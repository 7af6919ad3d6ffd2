use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{EngineConfig, Grid};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gridcalc.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("Invalid config {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Application settings.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of columns, at most 26 so each one has a letter.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let grid = Grid::default();
        Self {
            width: grid.width(),
            height: grid.height(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] when it
    /// exists, otherwise the defaults.
    pub fn discover(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Grid::check_dimensions(self.width, self.height)
            .map_err(|error| ConfigError::Invalid(error.to_string()))?;
        if self.engine.max_reference_depth == 0 {
            return Err(ConfigError::Invalid(
                "engine.max_reference_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (4, 6));
        assert_eq!(config.engine.max_reference_depth, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"height": 20}"#);
        let config = AppConfig::load(&path).unwrap();
        assert_eq!((config.width, config.height), (4, 20));
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_nested_engine_settings() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"width": 26, "engine": {"max_reference_depth": 64}}"#);
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.width, 26);
        assert_eq!(config.engine.max_reference_depth, 64);
    }

    #[test]
    fn test_rejects_too_many_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"width": 27}"#);
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = AppConfig { height: 0, ..AppConfig::default() };
        match config.validate() {
            Err(ConfigError::Invalid(message)) => assert_eq!(message, "height must be at least 1"),
            other => panic!("unexpected result {other:?}"),
        }
        let config = AppConfig { width: 0, ..AppConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_depth() {
        let config = AppConfig {
            engine: EngineConfig { max_reference_depth: 0 },
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_and_io_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[1, 2");
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            AppConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_discover_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"width": 3}"#);
        let config = AppConfig::discover(path.to_str()).unwrap();
        assert_eq!(config.width, 3);
    }
}
