//! # gatehouse-users
//!
//! The resource service: CRUD over user profiles, every `/users` route gated
//! by the access guard.
//!
//! Request flow: bearer token -> [`Caller`] (401 on failure) -> access rule
//! (403) -> validation (422) -> store (404 / 400 on conflicts).

pub mod api;
pub mod auth;
pub mod error;
pub mod service;
pub mod state;

pub use api::create_router;
pub use auth::Caller;
pub use error::UsersError;
pub use service::{DeleteResponse, ProfileService};
pub use state::UsersState;
