//! Access error types.

use thiserror::Error;

/// Why a request was not allowed through the guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No usable `Authorization: Bearer` header.
    #[error("Not authenticated")]
    MissingCredentials,

    /// Signature checks out but the token is past its expiry.
    #[error("Token has expired")]
    TokenExpired,

    /// Anything else wrong with the token.
    #[error("Invalid token")]
    TokenInvalid,

    /// Authenticated, but the role or ownership rule says no.
    #[error("{0}")]
    Forbidden(String),
}

impl AccessError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        AccessError::Forbidden(message.into())
    }

    /// True for the variants that mean "who are you?" rather than "no".
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AccessError::Forbidden(_))
    }

    /// Short, stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AccessError::MissingCredentials => "missing_credentials",
            AccessError::TokenExpired => "token_expired",
            AccessError::TokenInvalid => "token_invalid",
            AccessError::Forbidden(_) => "forbidden",
        }
    }
}
