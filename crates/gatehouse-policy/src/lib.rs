//! Gatehouse access guard
//!
//! Every request to a protected resource goes through the same two steps:
//!
//! 1. [`AccessGuard::authenticate`] turns a bearer token into an [`Identity`]
//!    (or rejects it as missing, expired or invalid).
//! 2. [`authorize`] checks the identity against the rule for the requested
//!    [`ProfileOperation`].
//!
//! Decode failures reject before any rule is consulted, and a rule rejection
//! happens before the caller touches any store.
//!
//! [`Identity`]: gatehouse_core::Identity

pub mod error;
pub mod guard;
pub mod rules;

pub use error::AccessError;
pub use guard::{AccessGuard, bearer_token};
pub use rules::{ProfileOperation, authorize, authorize_owner_or_admin, require_role};
