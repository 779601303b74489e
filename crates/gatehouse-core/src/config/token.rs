//! Token signing configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// HMAC algorithms accepted for signing. The secret is symmetric, so only the
/// HS family is meaningful here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

/// Configuration for token issuing and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default)]
    pub algorithm: SigningAlgorithm,

    /// Environment variable containing the shared secret.
    #[serde(default = "default_secret_env")]
    pub secret_env: String,

    /// Path to a file containing the shared secret.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,

    /// Lifetime of newly issued tokens (humantime, e.g. "30m", "12h").
    #[serde(default = "default_ttl")]
    pub ttl: String,

    /// Clock skew tolerated when checking expiry, in seconds.
    #[serde(default)]
    pub leeway_secs: u64,
}

fn default_secret_env() -> String {
    "GATEHOUSE_SECRET_KEY".to_string()
}

/// Longest token lifetime accepted from configuration.
const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 3600);

fn default_ttl() -> String {
    "30m".to_string()
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            algorithm: SigningAlgorithm::default(),
            secret_env: default_secret_env(),
            secret_file: None,
            ttl: default_ttl(),
            leeway_secs: 0,
        }
    }
}

impl TokenConfig {
    pub fn ttl(&self) -> Result<Duration, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDuration {
            value: self.ttl.clone(),
            reason,
        };
        let ttl = humantime::parse_duration(&self.ttl).map_err(|e| invalid(e.to_string()))?;
        if ttl > MAX_TTL {
            return Err(invalid(format!(
                "must not exceed {} days",
                MAX_TTL.as_secs() / 86_400
            )));
        }
        Ok(ttl)
    }

    /// Resolve the signing secret from environment or file.
    pub fn resolve_secret(&self) -> Result<String, ConfigError> {
        // Try environment variable first
        if let Ok(secret) = std::env::var(&self.secret_env)
            && !secret.is_empty()
        {
            return Ok(secret);
        }

        // Try file path
        if let Some(path) = &self.secret_file {
            let secret = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let secret = secret.trim();
            if !secret.is_empty() {
                return Ok(secret.to_string());
            }
        }

        Err(ConfigError::MissingSecret {
            env: self.secret_env.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const UNSET_ENV: &str = "GATEHOUSE_TEST_SECRET_THAT_IS_NEVER_SET";

    #[test]
    fn test_secret_from_file_is_trimmed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  file-secret-value  ").unwrap();

        let cfg = TokenConfig {
            secret_env: UNSET_ENV.to_string(),
            secret_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(cfg.resolve_secret().unwrap(), "file-secret-value");
    }

    #[test]
    fn test_missing_secret() {
        let cfg = TokenConfig {
            secret_env: UNSET_ENV.to_string(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.resolve_secret(),
            Err(ConfigError::MissingSecret { .. })
        ));
    }

    #[test]
    fn test_blank_secret_file_counts_as_missing() {
        let file = NamedTempFile::new().unwrap();
        let cfg = TokenConfig {
            secret_env: UNSET_ENV.to_string(),
            secret_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            cfg.resolve_secret(),
            Err(ConfigError::MissingSecret { .. })
        ));
    }

    #[test]
    fn test_ttl_parsing() {
        let cfg = TokenConfig {
            ttl: "12h".to_string(),
            ..Default::default()
        };
        assert_eq!(cfg.ttl().unwrap(), Duration::from_secs(12 * 3600));
    }

    #[test]
    fn test_ttl_beyond_cap_rejected() {
        let cfg = TokenConfig {
            ttl: "300000years".to_string(),
            ..Default::default()
        };
        assert!(matches!(cfg.ttl(), Err(ConfigError::InvalidDuration { .. })));

        let cfg = TokenConfig {
            ttl: "5years".to_string(),
            ..Default::default()
        };
        assert!(cfg.ttl().unwrap() <= MAX_TTL);
    }
}
