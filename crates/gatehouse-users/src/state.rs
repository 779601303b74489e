use crate::service::ProfileService;
use anyhow::Context;
use gatehouse_core::GatehouseConfig;
use gatehouse_policy::AccessGuard;
use gatehouse_store::open_profile_store;
use gatehouse_token::{SigningKey, TokenVerifier};
use std::sync::Arc;

/// Shared state of the users service.
pub struct UsersState {
    pub guard: AccessGuard,
    pub profiles: ProfileService,
}

impl UsersState {
    pub fn new(guard: AccessGuard, profiles: ProfileService) -> Arc<Self> {
        Arc::new(Self { guard, profiles })
    }

    pub async fn init(cfg: &GatehouseConfig) -> anyhow::Result<Arc<Self>> {
        let key = SigningKey::from_config(&cfg.token).context("loading token signing secret")?;
        let guard = AccessGuard::new(TokenVerifier::new(key, cfg.token.leeway_secs));

        let store = open_profile_store(&cfg.users.database_url)
            .await
            .with_context(|| format!("opening profile store {}", cfg.users.database_url))?;

        Ok(Self::new(guard, ProfileService::new(store)))
    }
}
