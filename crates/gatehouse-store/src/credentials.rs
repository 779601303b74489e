//! Issuer credential records.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::{Role, UserId};

/// A stored credential. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A credential about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Storage for issuer credentials.
///
/// `insert` must reject a duplicate username atomically with
/// [`StoreError::Duplicate`], even when two inserts race.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError>;

    async fn find_by_username(&self, username: &str)
    -> Result<Option<CredentialRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
