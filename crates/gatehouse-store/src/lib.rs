//! # gatehouse-store
//!
//! Persistence for the two Gatehouse services:
//!
//! - [`CredentialStore`]: usernames, password hashes and roles (issuer)
//! - [`ProfileStore`]: profile records keyed by integer id (users service)
//!
//! Both traits have a SQLite backend ([`SqliteStore`]) and a volatile one
//! ([`MemoryStore`]). Uniqueness is always enforced inside the store.

pub mod credentials;
pub mod error;
pub mod memory;
pub mod profiles;
pub mod sqlite;

pub use credentials::{CredentialRecord, CredentialStore, NewCredential};
pub use error::{StoreError, UniqueField};
pub use memory::MemoryStore;
pub use profiles::ProfileStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

/// True for the URLs that select the in-memory backend.
pub fn is_memory_url(database_url: &str) -> bool {
    matches!(
        database_url.trim(),
        "memory" | "sqlite::memory:" | "sqlite://:memory:"
    )
}

/// Open the credential store named by `database_url`.
pub async fn open_credential_store(
    database_url: &str,
) -> Result<Arc<dyn CredentialStore>, StoreError> {
    if is_memory_url(database_url) {
        tracing::info!("using in-memory credential store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    tracing::info!(database_url, "opening credential store");
    Ok(Arc::new(SqliteStore::connect(database_url).await?))
}

/// Open the profile store named by `database_url`.
pub async fn open_profile_store(database_url: &str) -> Result<Arc<dyn ProfileStore>, StoreError> {
    if is_memory_url(database_url) {
        tracing::info!("using in-memory profile store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    tracing::info!(database_url, "opening profile store");
    Ok(Arc::new(SqliteStore::connect(database_url).await?))
}
