//! Configuration management for pagelens.
//!
//! Provides TOML-based configuration loaded from the working directory
//! with environment variable overrides. Every field has a default, so the
//! service runs without any config file present.

use crate::error::ConfigResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file name, looked up in the working directory.
const CONFIG_FILE: &str = "pagelens.toml";

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Scan behavior settings
    pub scanning: ScanningConfig,
    /// Response cache settings
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from `pagelens.toml`, falling back to defaults
    /// if the file does not exist.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from a specific path, falling back to defaults
    /// if the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PAGELENS_PORT`: override the server port
    /// - `PAGELENS_WORKERS`: override the liveness worker count
    /// - `PAGELENS_CACHE_TTL_SECS`: override the response cache TTL
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("PAGELENS_PORT") {
            if let Ok(port) = val.parse() {
                config.server.port = port;
                tracing::debug!("override server.port from env: {}", port);
            }
        }

        if let Ok(val) = std::env::var("PAGELENS_WORKERS") {
            if let Ok(workers) = val.parse() {
                config.scanning.workers = workers;
                tracing::debug!("override scanning.workers from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("PAGELENS_CACHE_TTL_SECS") {
            if let Ok(ttl) = val.parse() {
                config.cache.ttl_secs = ttl;
                tracing::debug!("override cache.ttl_secs from env: {}", ttl);
            }
        }

        Ok(config)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the API listens on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

/// Scan behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of concurrent liveness workers (0 = available parallelism)
    pub workers: usize,
    /// Fetch timeout in seconds
    pub timeout_secs: u64,
    /// User agent string sent with every fetch
    pub user_agent: String,
}

impl ScanningConfig {
    /// Resolve the worker count, substituting the machine's available
    /// parallelism when configured as `0`.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        } else {
            self.workers
        }
    }

    /// Fetch timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            timeout_secs: 10,
            user_agent: "Pagelens/0.1.0 (+https://github.com/pagelens/pagelens)".to_string(),
        }
    }
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a cached result stays valid, in seconds
    pub ttl_secs: u64,
    /// How often expired entries are swept out, in seconds
    pub sweep_interval_secs: u64,
}

impl CacheConfig {
    /// Cache entry lifetime as a [`Duration`].
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep cadence as a [`Duration`].
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            // Results stay cached for 2 hours, swept every 10 minutes.
            ttl_secs: 7200,
            sweep_interval_secs: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.scanning.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 7200);
        assert!(config.scanning.worker_count() >= 1);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[scanning]"));
        assert!(toml_str.contains("[cache]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.server.port, config.server.port);
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("pagelens.toml");

        fs::write(
            &path,
            "[server]\nport = 9100\n\n[scanning]\nworkers = 4\n",
        )
        .expect("write config file");

        let config = AppConfig::load_from(&path).expect("load config");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.scanning.worker_count(), 4);
        // Unspecified sections keep their defaults.
        assert_eq!(config.cache.ttl_secs, 7200);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config =
            AppConfig::load_from(&tmp.path().join("absent.toml")).expect("defaults for missing file");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[cache]
ttl_secs = 60
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.server.port, 8000);
    }
}
