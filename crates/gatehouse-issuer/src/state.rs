use crate::bootstrap::bootstrap_admin;
use crate::issuer::CredentialIssuer;
use crate::password::PasswordHashing;
use anyhow::Context;
use gatehouse_core::GatehouseConfig;
use gatehouse_store::open_credential_store;
use gatehouse_token::{SigningKey, TokenIssuer};
use std::sync::Arc;

/// Shared state of the issuer service.
pub struct IssuerState {
    pub issuer: CredentialIssuer,
}

impl IssuerState {
    pub fn new(issuer: CredentialIssuer) -> Arc<Self> {
        Arc::new(Self { issuer })
    }

    /// Build everything the service needs from configuration: signing key,
    /// credential store (migrated), password hashing and the bootstrap admin.
    pub async fn init(cfg: &GatehouseConfig) -> anyhow::Result<Arc<Self>> {
        let key = SigningKey::from_config(&cfg.token).context("loading token signing secret")?;
        let ttl = cfg.token.ttl().context("parsing [token].ttl")?;

        let store = open_credential_store(&cfg.issuer.database_url)
            .await
            .with_context(|| format!("opening credential store {}", cfg.issuer.database_url))?;
        let passwords =
            PasswordHashing::new(&cfg.password).context("configuring password hashing")?;

        bootstrap_admin(
            store.as_ref(),
            &passwords,
            cfg.issuer.resolve_bootstrap_password(),
        )
        .await
        .context("bootstrapping admin user")?;

        let issuer = CredentialIssuer::new(store, passwords, TokenIssuer::new(key, ttl));
        Ok(Self::new(issuer))
    }
}
