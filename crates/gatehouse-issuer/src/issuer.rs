//! Registration and login.

use crate::error::IssuerError;
use crate::password::PasswordHashing;
use chrono::{DateTime, Utc};
use gatehouse_core::{Identity, Role, UserId};
use gatehouse_store::{CredentialRecord, CredentialStore, NewCredential};
use gatehouse_token::{IssuedToken, TokenIssuer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body returned by `/register` and `/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            user_id: issued.claims.user_id,
            expires_at: issued.claims.expires_at(),
            access_token: issued.token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Verifies credentials and issues identity tokens.
#[derive(Clone)]
pub struct CredentialIssuer {
    store: Arc<dyn CredentialStore>,
    passwords: PasswordHashing,
    tokens: TokenIssuer,
}

impl CredentialIssuer {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: PasswordHashing,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Create a credential and issue its first token.
    pub async fn register(&self, request: RegisterRequest) -> Result<IssuedToken, IssuerError> {
        validate_credentials(&request.username, &request.password)?;

        if self.store.find_by_username(&request.username).await?.is_some() {
            tracing::debug!(username = %request.username, "registration rejected: username taken");
            return Err(IssuerError::DuplicateIdentity);
        }

        let password_hash = self.passwords.hash(request.password).await?;
        // The unique constraint still decides if two registrations race.
        let record = self
            .store
            .insert(NewCredential {
                username: request.username,
                password_hash,
                role: request.role,
            })
            .await?;

        tracing::info!(
            username = %record.username,
            user_id = record.id,
            role = %record.role,
            "registered user"
        );
        self.issue_for(&record)
    }

    /// Check a username/password pair and issue a token.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`IssuerError::InvalidCredentials`] after comparable work.
    pub async fn login(&self, request: LoginRequest) -> Result<IssuedToken, IssuerError> {
        validate_credentials(&request.username, &request.password)?;

        let Some(record) = self.store.find_by_username(&request.username).await? else {
            self.passwords.verify_dummy(request.password).await?;
            tracing::debug!("login rejected");
            return Err(IssuerError::InvalidCredentials);
        };

        let verified = self
            .passwords
            .verify(request.password, record.password_hash.clone())
            .await?;
        if !verified {
            tracing::debug!("login rejected");
            return Err(IssuerError::InvalidCredentials);
        }

        tracing::info!(username = %record.username, user_id = record.id, "login");
        self.issue_for(&record)
    }

    fn issue_for(&self, record: &CredentialRecord) -> Result<IssuedToken, IssuerError> {
        let identity = Identity::new(record.username.clone(), record.id, record.role);
        Ok(self.tokens.issue(&identity)?)
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<(), IssuerError> {
    if username.trim().is_empty() {
        return Err(IssuerError::Validation("username must not be empty".into()));
    }
    if password.is_empty() {
        return Err(IssuerError::Validation("password must not be empty".into()));
    }
    Ok(())
}
