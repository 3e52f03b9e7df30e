//! Configuration system
//!
//! Pool sizing lives in data rather than code so hot pools can be pre-sized
//! per title without rebuilding. Files are dispatched on extension: `.toml`
//! or `.ron`.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::pool::{GrowthPolicy, PoolError, PoolResult};

/// Capacity used when no configuration file overrides it
pub const DEFAULT_INITIAL_CAPACITY: usize = 100;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// # Pool Configuration
///
/// Sizing for a single pool. Pools that grow at runtime pay an O(n) copy
/// each time, so hot pools should set `initial_capacity` close to their
/// expected peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of slots allocated up front
    pub initial_capacity: usize,
    /// How the pool grows when a fetch finds it full
    pub growth: GrowthPolicy,
}

impl PoolConfig {
    /// Create a configuration with the given capacity and the default growth policy
    #[must_use]
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// Replace the growth policy
    #[must_use]
    pub const fn growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Check that a pool can be built from this configuration
    pub fn validate(&self) -> PoolResult<()> {
        if self.initial_capacity == 0 {
            return Err(PoolError::invalid("initial capacity must be greater than zero"));
        }
        self.growth.validate()
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth: GrowthPolicy::default(),
        }
    }
}

impl Config for PoolConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("engine_pool_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PoolConfig::default();
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.growth, GrowthPolicy::Fixed { increment: 25 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = PoolConfig::with_capacity(0);
        assert!(matches!(config.validate(), Err(PoolError::InvalidArgument { .. })));
    }

    #[test]
    fn test_zero_increment_rejected() {
        let config = PoolConfig::with_capacity(4).growth(GrowthPolicy::Fixed { increment: 0 });
        assert!(matches!(config.validate(), Err(PoolError::InvalidArgument { .. })));
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("pool.ron");
        let config = PoolConfig::with_capacity(256).growth(GrowthPolicy::Doubling);

        config.save_to_file(&path).unwrap();
        let loaded = PoolConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("pool.toml");
        let config = PoolConfig::with_capacity(64).growth(GrowthPolicy::Fixed { increment: 16 });

        config.save_to_file(&path).unwrap();
        let loaded = PoolConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_partial_file_uses_defaults() {
        let path = temp_path("partial.ron");
        std::fs::write(&path, "(initial_capacity: 12)").unwrap();
        let loaded = PoolConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.initial_capacity, 12);
        assert_eq!(loaded.growth, GrowthPolicy::default());
    }

    #[test]
    fn test_unsupported_format() {
        let result = PoolConfig::default().save_to_file(temp_path("pool.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = PoolConfig::load_from_file(temp_path("does_not_exist.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let loaded = PoolConfig::load_or_default(temp_path("absent.ron")).unwrap();
        assert_eq!(loaded, PoolConfig::default());
    }
}
