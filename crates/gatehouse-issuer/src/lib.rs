//! # gatehouse-issuer
//!
//! The credential issuer: registers usernames with Argon2id-hashed passwords,
//! checks logins, and hands out signed identity tokens carrying
//! `{sub, role, user_id}`.
//!
//! ## Endpoints
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/` | service banner |
//! | GET | `/health` | liveness |
//! | POST | `/register` | 201 token, 400 if the username is taken |
//! | POST | `/login` | 200 token, 401 on bad credentials |

pub mod api;
pub mod bootstrap;
pub mod error;
pub mod issuer;
pub mod password;
pub mod state;

pub use api::create_router;
pub use bootstrap::{BOOTSTRAP_ADMIN_USERNAME, bootstrap_admin};
pub use error::IssuerError;
pub use issuer::{CredentialIssuer, LoginRequest, RegisterRequest, TokenResponse};
pub use password::PasswordHashing;
pub use state::IssuerState;
