//! # gatehouse-core
//!
//! Types shared by every Gatehouse crate:
//!
//! - [`Identity`] and [`Role`]: who a caller is, as reconstructed from a token
//! - [`Profile`], [`NewProfile`], [`ProfileUpdate`]: the resource records guarded
//!   by the users service
//! - [`config`]: the TOML configuration model for both services

// Configuration types shared across all Gatehouse crates
pub mod config;

pub mod identity;
pub mod profile;

pub use config::{
    ConfigError, GatehouseConfig, IssuerConfig, ObservabilityConfig, PasswordConfig,
    SigningAlgorithm, TokenConfig, UsersConfig,
};
pub use identity::{Identity, Role, UnknownRole, UserId};
pub use profile::{NewProfile, Profile, ProfileUpdate, ProfileValidationError};
