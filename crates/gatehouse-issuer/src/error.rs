//! Error types for the issuer crate.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use gatehouse_store::{StoreError, UniqueField};
use gatehouse_token::TokenError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by registration and login.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// Username is already taken.
    #[error("Username already registered")]
    DuplicateIdentity,

    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Request body failed validation.
    #[error("{0}")]
    Validation(String),

    /// Failed to hash or check a password.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for IssuerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(UniqueField::Username) => IssuerError::DuplicateIdentity,
            other => IssuerError::Store(other),
        }
    }
}

impl IssuerError {
    pub fn status(&self) -> StatusCode {
        match self {
            IssuerError::DuplicateIdentity => StatusCode::BAD_REQUEST,
            IssuerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            IssuerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IssuerError::Hashing(_) | IssuerError::Token(_) | IssuerError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for IssuerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "issuer request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
