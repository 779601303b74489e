//! Per-service settings: bind address and backing store.

use serde::{Deserialize, Serialize};

/// Env var that overrides `[issuer].bootstrap_admin_password`.
pub const BOOTSTRAP_ADMIN_PASSWORD_ENV: &str = "GATEHOUSE_BOOTSTRAP_ADMIN_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Bind address, e.g. "0.0.0.0:8001"
    #[serde(default = "default_issuer_bind")]
    pub bind: String,

    /// Credential store. `sqlite://...` or `memory`.
    #[serde(default = "default_issuer_db")]
    pub database_url: String,

    /// Password for the `admin` user created on first start. For security:
    /// prefer setting env `GATEHOUSE_BOOTSTRAP_ADMIN_PASSWORD`.
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

fn default_issuer_bind() -> String {
    "0.0.0.0:8001".to_string()
}

fn default_issuer_db() -> String {
    "sqlite://data/gatehouse-auth.sqlite".to_string()
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            bind: default_issuer_bind(),
            database_url: default_issuer_db(),
            bootstrap_admin_password: None,
        }
    }
}

impl IssuerConfig {
    /// Bootstrap password, env first. Blank values count as unset.
    pub fn resolve_bootstrap_password(&self) -> Option<String> {
        let set = |p: &String| !p.trim().is_empty();
        std::env::var(BOOTSTRAP_ADMIN_PASSWORD_ENV)
            .ok()
            .filter(set)
            .or_else(|| self.bootstrap_admin_password.clone().filter(set))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersConfig {
    /// Bind address, e.g. "0.0.0.0:8002"
    #[serde(default = "default_users_bind")]
    pub bind: String,

    /// Profile store. `sqlite://...` or `memory`.
    #[serde(default = "default_users_db")]
    pub database_url: String,
}

fn default_users_bind() -> String {
    "0.0.0.0:8002".to_string()
}

fn default_users_db() -> String {
    "sqlite://data/gatehouse-users.sqlite".to_string()
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            bind: default_users_bind(),
            database_url: default_users_db(),
        }
    }
}
