//! Configuration System
//!
//! Network selection (production vs. local development), the canister that
//! hosts the event actor, and logging. Loaded from TOML files with
//! environment variable overrides on native targets.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

/// Production gateway
pub const IC_HOST: &str = "https://ic0.app";

/// Local development replica
pub const LOCAL_HOST: &str = "http://localhost:4943";

/// Canister id used when none is configured (the first id a local replica hands out)
pub const DEFAULT_CANISTER_ID: &str = "bkyz2-fmaaa-aaaaa-qaaaq-cai";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which network the actor lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production (`DFX_NETWORK=ic`)
    Ic,
    /// Local development replica; anything other than `ic`
    #[default]
    Local,
}

impl Network {
    pub fn default_host(self) -> &'static str {
        match self {
            Network::Ic => IC_HOST,
            Network::Local => LOCAL_HOST,
        }
    }

    /// Non-production replicas need their root key fetched before signed calls
    pub fn needs_root_key(self) -> bool {
        !matches!(self, Network::Ic)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Ic => write!(f, "ic"),
            Network::Local => write!(f, "local"),
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ic" => Ok(Network::Ic),
            "local" | "" => Ok(Network::Local),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }
}

/// Where the event actor is reached
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub network: Network,

    #[serde(default = "default_canister_id")]
    pub canister_id: String,

    /// Overrides the network's default host
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_canister_id() -> String {
    DEFAULT_CANISTER_ID.to_string()
}

fn default_request_timeout() -> u64 {
    30_000
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            canister_id: default_canister_id(),
            host: None,
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl NetworkConfig {
    pub fn new(network: Network, canister_id: impl Into<String>) -> Self {
        Self {
            network,
            canister_id: canister_id.into(),
            ..Default::default()
        }
    }

    /// Gateway base URL without trailing slash
    pub fn host(&self) -> String {
        self.host
            .as_deref()
            .unwrap_or_else(|| self.network.default_host())
            .trim_end_matches('/')
            .to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("chronox").join("config.toml")),
            Some(PathBuf::from("/etc/chronox/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the process environment in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup("DFX_NETWORK") {
            self.network.network = network.parse()?;
        }
        if let Some(canister_id) = lookup("CANISTER_ID_CHRONOX_BACKEND") {
            self.network.canister_id = canister_id;
        }
        if let Some(host) = lookup("CHRONOX_HOST") {
            self.network.host = Some(host);
        }
        if let Some(level) = lookup("CHRONOX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CHRONOX_LOG_FORMAT") {
            self.logging.format = format;
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[cfg(not(target_arch = "wasm32"))]
    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Unknown network '{0}' (expected 'ic' or 'local')")]
    InvalidNetwork(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# ChronoX Configuration
#
# Environment variables override these settings:
# - DFX_NETWORK
# - CANISTER_ID_CHRONOX_BACKEND
# - CHRONOX_HOST
# - CHRONOX_LOG_LEVEL
# - CHRONOX_LOG_FORMAT

[network]
# "ic" for production, "local" for a development replica
network = "local"

# Canister hosting the event actor
canister_id = "{DEFAULT_CANISTER_ID}"

# Gateway override (default: {IC_HOST} or {LOCAL_HOST})
# host = "http://127.0.0.1:4943"

# Request timeout in milliseconds
request_timeout_ms = 30000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_network_hosts() {
        assert_eq!(NetworkConfig::new(Network::Ic, "x").host(), "https://ic0.app");
        assert_eq!(NetworkConfig::default().host(), "http://localhost:4943");

        let custom = NetworkConfig {
            host: Some("http://127.0.0.1:9000/".to_string()),
            ..Default::default()
        };
        assert_eq!(custom.host(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("ic".parse::<Network>().unwrap(), Network::Ic);
        assert_eq!("IC".parse::<Network>().unwrap(), Network::Ic);
        assert_eq!("local".parse::<Network>().unwrap(), Network::Local);
        assert!(matches!(
            "mainnet".parse::<Network>(),
            Err(ConfigError::InvalidNetwork(_))
        ));
        assert!(Network::Local.needs_root_key());
        assert!(!Network::Ic.needs_root_key());
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.network.network, Network::Local);
        assert_eq!(config.network.canister_id, DEFAULT_CANISTER_ID);
        assert_eq!(config.network.request_timeout_ms, 30_000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[network]\nnetwork = \"ic\"\ncanister_id = \"abc-cai\"\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.network.network, Network::Ic);
        assert_eq!(config.network.canister_id, "abc-cai");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network\nnetwork = ").unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("DFX_NETWORK", "ic"),
            ("CANISTER_ID_CHRONOX_BACKEND", "prod-cai"),
            ("CHRONOX_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.network.network, Network::Ic);
        assert_eq!(config.network.canister_id, "prod-cai");
        assert_eq!(config.network.host(), IC_HOST);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bad_network_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "DFX_NETWORK").then(|| "moon".to_string())
        });
        assert!(result.is_err());
    }
}
