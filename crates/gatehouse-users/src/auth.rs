use crate::error::UsersError;
use crate::state::UsersState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use gatehouse_core::Identity;
use std::sync::Arc;

/// The authenticated caller, extracted from `Authorization: Bearer <token>`.
///
/// Rejects with 401 before the handler runs when the header is missing or
/// the token does not verify.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl FromRequestParts<Arc<UsersState>> for Caller {
    type Rejection = UsersError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<UsersState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match state.guard.authenticate_header(header) {
            Ok(identity) => Ok(Caller(identity)),
            Err(err) => {
                tracing::debug!(
                    kind = err.kind(),
                    path = %parts.uri.path(),
                    "authentication failed"
                );
                Err(err.into())
            }
        }
    }
}
