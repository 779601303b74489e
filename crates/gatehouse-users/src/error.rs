//! Error types for the users service.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use gatehouse_core::ProfileValidationError;
use gatehouse_policy::AccessError;
use gatehouse_store::{StoreError, UniqueField};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersError {
    /// Authentication or policy rejection.
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("User not found")]
    NotFound,

    /// A unique field is already taken.
    #[error("{}", conflict_message(.0))]
    Conflict(UniqueField),

    #[error("{0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

fn conflict_message(field: &UniqueField) -> &'static str {
    match field {
        UniqueField::ProfileId => "User with this id already exists",
        UniqueField::Email => "Email already registered",
        UniqueField::PhoneNumber => "Phone number already registered",
        UniqueField::Username => "Username already registered",
    }
}

impl From<StoreError> for UsersError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => UsersError::Conflict(field),
            other => UsersError::Store(other),
        }
    }
}

impl From<ProfileValidationError> for UsersError {
    fn from(err: ProfileValidationError) -> Self {
        UsersError::Validation(err.to_string())
    }
}

impl UsersError {
    pub fn status(&self) -> StatusCode {
        match self {
            UsersError::Access(err) if err.is_unauthenticated() => StatusCode::UNAUTHORIZED,
            UsersError::Access(_) => StatusCode::FORBIDDEN,
            UsersError::NotFound => StatusCode::NOT_FOUND,
            UsersError::Conflict(_) => StatusCode::BAD_REQUEST,
            UsersError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            UsersError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            UsersError::Store(err) => {
                tracing::error!(error = %err, "users request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (UsersError::from(AccessError::MissingCredentials), StatusCode::UNAUTHORIZED),
            (UsersError::from(AccessError::TokenExpired), StatusCode::UNAUTHORIZED),
            (UsersError::from(AccessError::TokenInvalid), StatusCode::UNAUTHORIZED),
            (UsersError::from(AccessError::forbidden("no")), StatusCode::FORBIDDEN),
            (UsersError::NotFound, StatusCode::NOT_FOUND),
            (UsersError::Conflict(UniqueField::Email), StatusCode::BAD_REQUEST),
            (UsersError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err:?}");
        }
    }

    #[test]
    fn test_conflict_messages() {
        assert_eq!(
            UsersError::from(StoreError::Duplicate(UniqueField::ProfileId)).to_string(),
            "User with this id already exists"
        );
        assert_eq!(
            UsersError::Conflict(UniqueField::Email).to_string(),
            "Email already registered"
        );
        assert_eq!(
            UsersError::Conflict(UniqueField::PhoneNumber).to_string(),
            "Phone number already registered"
        );
    }

    #[test]
    fn test_access_messages_pass_through() {
        assert_eq!(
            UsersError::from(AccessError::TokenExpired).to_string(),
            "Token has expired"
        );
    }
}
