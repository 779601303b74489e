//! Error types for the token crate.

use gatehouse_core::{ConfigError, UnknownRole};
use thiserror::Error;

/// Errors that can occur while issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature is valid but the token is past its expiry.
    #[error("token has expired at {expired_at}")]
    Expired { expired_at: i64 },

    /// Malformed token, bad signature or unexpected algorithm.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Token is missing required claim.
    #[error("token missing required claim: {claim}")]
    MissingClaim { claim: &'static str },

    /// The role claim is not a known role.
    #[error("invalid role claim: {0}")]
    UnknownRole(#[from] UnknownRole),

    /// Failed to sign a token.
    #[error("failed to create token: {0}")]
    CreationFailed(String),

    /// Secret or algorithm could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired { .. })
    }
}
