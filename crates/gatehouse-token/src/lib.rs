//! # gatehouse-token
//!
//! Identity tokens for Gatehouse.
//!
//! This crate provides functionality for:
//! - Loading the shared HMAC signing secret from configuration
//! - Issuing tokens that carry `{sub, role, user_id, iat, exp, jti}`
//! - Verifying tokens and turning them back into an [`Identity`]
//! - Inspecting a token's claims without verification (debugging only)
//!
//! ## Token Model
//!
//! Tokens are stateless: nothing is stored server-side, so a token stays valid
//! until it expires. Any service holding the secret can verify it.
//!
//! | Claim | Meaning |
//! |-------|---------|
//! | `sub` | username at issuance |
//! | `role` | `"admin"` or `"client"` |
//! | `user_id` | numeric id, used for ownership checks |
//! | `iat` / `exp` | issued-at / expiry, unix seconds |
//! | `jti` | random token id |
//!
//! [`Identity`]: gatehouse_core::Identity

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use claims::TokenClaims;
pub use error::TokenError;
pub use keys::SigningKey;
pub use token::{IssuedToken, TokenInfo, TokenIssuer, TokenVerifier, inspect_token_unverified};
