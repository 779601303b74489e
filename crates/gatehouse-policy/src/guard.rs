//! Token authentication.

use crate::error::AccessError;
use gatehouse_core::Identity;
use gatehouse_token::{TokenError, TokenVerifier};

/// Turns bearer tokens into verified identities.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    verifier: TokenVerifier,
}

impl AccessGuard {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Authenticate a raw token against the current time.
    pub fn authenticate(&self, token: &str) -> Result<Identity, AccessError> {
        classify(self.verifier.verify(token))
    }

    /// Authenticate a raw token against `now` (unix seconds).
    pub fn authenticate_at(&self, token: &str, now: i64) -> Result<Identity, AccessError> {
        classify(self.verifier.verify_at(token, now))
    }

    /// Authenticate straight from an `Authorization` header value.
    pub fn authenticate_header(&self, header: Option<&str>) -> Result<Identity, AccessError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(AccessError::MissingCredentials)?;
        self.authenticate(token)
    }
}

fn classify(result: Result<Identity, TokenError>) -> Result<Identity, AccessError> {
    result.map_err(|err| {
        if err.is_expired() {
            tracing::debug!("rejected expired token");
            AccessError::TokenExpired
        } else {
            tracing::debug!(error = %err, "rejected invalid token");
            AccessError::TokenInvalid
        }
    })
}

/// Extract the token from an `Authorization: Bearer <token>` value.
///
/// The scheme is case-insensitive. Returns `None` for any other scheme or an
/// empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use gatehouse_core::{Role, SigningAlgorithm};
    use gatehouse_token::{SigningKey, TokenIssuer};
    use pretty_assertions::assert_eq;

    const SECRET: &[u8] = b"policy-test-secret-0123456789abcdef";

    fn key() -> SigningKey {
        SigningKey::from_secret(SECRET, SigningAlgorithm::HS256)
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(key(), std::time::Duration::from_secs(1800))
    }

    fn guard() -> AccessGuard {
        AccessGuard::new(TokenVerifier::new(key(), 0))
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER   abc  "), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_authenticate_valid_token() {
        let identity = Identity::new("alice", 7, Role::Client);
        let issued = issuer().issue(&identity).unwrap();
        assert_eq!(guard().authenticate(&issued.token).unwrap(), identity);
    }

    #[test]
    fn test_authenticate_expired_token() {
        let identity = Identity::new("alice", 7, Role::Admin);
        let issued = issuer()
            .issue_at(&identity, Utc::now() - Duration::hours(1))
            .unwrap();
        assert_eq!(
            guard().authenticate(&issued.token),
            Err(AccessError::TokenExpired)
        );
    }

    #[test]
    fn test_authenticate_at_explicit_clock() {
        let identity = Identity::new("alice", 7, Role::Admin);
        let issued = issuer().issue(&identity).unwrap();
        let exp = issued.claims.exp;

        assert!(guard().authenticate_at(&issued.token, exp).is_ok());
        assert_eq!(
            guard().authenticate_at(&issued.token, exp + 1),
            Err(AccessError::TokenExpired)
        );
    }

    #[test]
    fn test_authenticate_wrong_secret() {
        let other = SigningKey::from_secret(
            b"a-completely-different-secret-value",
            SigningAlgorithm::HS256,
        );
        let identity = Identity::new("alice", 7, Role::Admin);
        let issued = TokenIssuer::new(other, std::time::Duration::from_secs(60))
            .issue(&identity)
            .unwrap();
        assert_eq!(
            guard().authenticate(&issued.token),
            Err(AccessError::TokenInvalid)
        );
    }

    #[test]
    fn test_authenticate_header() {
        let identity = Identity::new("bob", 2, Role::Client);
        let issued = issuer().issue(&identity).unwrap();
        let header = format!("Bearer {}", issued.token);

        assert_eq!(guard().authenticate_header(Some(&header)).unwrap(), identity);
        assert_eq!(
            guard().authenticate_header(None),
            Err(AccessError::MissingCredentials)
        );
        assert_eq!(
            guard().authenticate_header(Some(&issued.token)),
            Err(AccessError::MissingCredentials)
        );
        assert_eq!(
            guard().authenticate_header(Some("Bearer garbage")),
            Err(AccessError::TokenInvalid)
        );
    }
}
