use crate::error::IssuerError;
use crate::password::PasswordHashing;
use gatehouse_core::Role;
use gatehouse_store::{CredentialRecord, CredentialStore, NewCredential, StoreError};

pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

/// On startup, if the credential store is empty, create an `admin` user.
///
/// Password source (highest precedence first):
/// - env `GATEHOUSE_BOOTSTRAP_ADMIN_PASSWORD`
/// - `gatehouse.toml` `[issuer].bootstrap_admin_password`
///
/// Without a password nothing is created. Returns the new record, if any.
pub async fn bootstrap_admin(
    store: &dyn CredentialStore,
    passwords: &PasswordHashing,
    password: Option<String>,
) -> Result<Option<CredentialRecord>, IssuerError> {
    if store.count().await? > 0 {
        return Ok(None);
    }

    let Some(password) = password else {
        tracing::info!("credential store is empty and no bootstrap admin password is configured");
        return Ok(None);
    };

    let password_hash = passwords.hash(password).await?;
    let inserted = store
        .insert(NewCredential {
            username: BOOTSTRAP_ADMIN_USERNAME.to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await;

    match inserted {
        Ok(record) => {
            tracing::warn!(
                user_id = record.id,
                "bootstrapped user 'admin' (password taken from env/config)"
            );
            Ok(Some(record))
        }
        // Another instance got there first.
        Err(StoreError::Duplicate(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
