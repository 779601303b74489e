//! Configuration types for Gatehouse.
//!
//! Both services read the same TOML file; each only looks at its own section
//! plus the shared `[token]` section.
//!
//! # Lookup
//!
//! 1. an explicit path (`--config`)
//! 2. env `GATEHOUSE_CONFIG`
//! 3. `gatehouse.toml` in the working directory, falling back to defaults
//!    when that file does not exist

pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use password::PasswordConfig;
pub use service::{IssuerConfig, UsersConfig};
pub use token::{SigningAlgorithm, TokenConfig};

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "GATEHOUSE_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "gatehouse.toml";

/// Complete Gatehouse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatehouseConfig {
    /// Credential issuer service.
    #[serde(default)]
    pub issuer: IssuerConfig,

    /// Profile (users) service.
    #[serde(default)]
    pub users: UsersConfig,

    /// Token signing and validation, shared by both services.
    #[serde(default)]
    pub token: TokenConfig,

    /// Password hashing cost.
    #[serde(default)]
    pub password: PasswordConfig,

    /// Logging output.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Emit JSON log lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,

    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_log_filter(),
        }
    }
}

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("signing secret not found (set env {env} or token.secret_file)")]
    MissingSecret { env: String },
}

impl GatehouseConfig {
    /// Load configuration following the lookup order in the module docs.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(Path::new(&p));
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: GatehouseConfig = toml::from_str(raw)?;
        // Surface a bad TTL at load time rather than on the first login.
        cfg.token.ttl()?;
        Ok(cfg)
    }
}
