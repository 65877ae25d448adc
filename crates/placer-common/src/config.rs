//! Configuration types for Placer
//!
//! The configuration file is TOML. Every field has a default, so a
//! missing file or a partial file both yield a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default number of keys requested per range scan during bulk loads.
///
/// Kept well below the per-request caps of common consensus-backed
/// stores so that a full page never gets rejected by the backend.
pub const DEFAULT_RANGE_LIMIT: usize = 100;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.range_limit == 0 {
            return Err(ConfigError::Invalid(
                "storage.range_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which key/value backend holds the metadata
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Volatile in-process map (tests and dry runs)
    Memory,
    /// Embedded redb database under `data_dir`
    #[default]
    Redb,
}

/// Metadata storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Directory holding the redb database file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Page size for paginated bulk loads
    #[serde(default = "default_range_limit")]
    pub range_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            range_limit: default_range_limit(),
        }
    }
}

impl StorageConfig {
    /// Path of the redb database file
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("meta.redb")
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./placer-data")
}

const fn default_range_limit() -> usize {
    DEFAULT_RANGE_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.storage.backend, BackendKind::Redb);
        assert_eq!(config.storage.range_limit, DEFAULT_RANGE_LIMIT);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.toml");
        std::fs::write(
            &path,
            "[storage]\nbackend = \"memory\"\nrange_limit = 500\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.backend, BackendKind::Memory);
        assert_eq!(config.storage.range_limit, 500);
        assert_eq!(config.storage.data_dir, PathBuf::from("./placer-data"));
        assert_eq!(
            config.storage.db_path(),
            PathBuf::from("./placer-data/meta.redb")
        );
    }

    #[test]
    fn test_zero_range_limit_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.toml");
        std::fs::write(&path, "[storage]\nrange_limit = 0\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.toml");
        std::fs::write(&path, "[storage\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }
}
