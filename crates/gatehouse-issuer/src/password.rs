//! Argon2id password hashing.
//!
//! Hashing is CPU-bound, so every call runs on the blocking pool.

use crate::error::IssuerError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use gatehouse_core::PasswordConfig;

/// Verified against when the username does not exist, so that unknown users
/// cost the same as wrong passwords.
const DUMMY_PASSWORD: &str = "gatehouse-dummy-password";

/// Hashes and verifies passwords with fixed Argon2id parameters.
#[derive(Clone)]
pub struct PasswordHashing {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl std::fmt::Debug for PasswordHashing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHashing")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}

impl PasswordHashing {
    pub fn new(config: &PasswordConfig) -> Result<Self, IssuerError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| IssuerError::Hashing(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, DUMMY_PASSWORD)?;
        Ok(Self { argon2, dummy_hash })
    }

    /// Hash `password` into a PHC string with a fresh random salt.
    pub async fn hash(&self, password: String) -> Result<String, IssuerError> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || hash_with(&argon2, &password))
            .await
            .map_err(|e| IssuerError::Hashing(e.to_string()))?
    }

    /// Check `password` against a stored PHC string.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, IssuerError> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || verify_with(&argon2, &password, &hash))
            .await
            .map_err(|e| IssuerError::Hashing(e.to_string()))?
    }

    /// Burn the same work as a real verification. Always `false`.
    pub async fn verify_dummy(&self, password: String) -> Result<bool, IssuerError> {
        self.verify(password, self.dummy_hash.clone()).await?;
        Ok(false)
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, IssuerError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IssuerError::Hashing(e.to_string()))
}

fn verify_with(argon2: &Argon2<'_>, password: &str, hash: &str) -> Result<bool, IssuerError> {
    let parsed = PasswordHash::new(hash).map_err(|e| IssuerError::Hashing(e.to_string()))?;
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}
