//! Token creation and verification.

use crate::claims::{RawClaims, TokenClaims, is_expired};
use crate::error::TokenError;
use crate::keys::SigningKey;
use chrono::{DateTime, Duration, Utc};
use gatehouse_core::{Identity, Role};
use jsonwebtoken::{DecodingKey, Header, Validation};

/// A freshly signed token and the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Signs identity tokens.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(key: SigningKey, ttl: std::time::Duration) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or(Duration::MAX);
        Self { key, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity`, valid from now.
    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let claims = TokenClaims::new(identity, issued_at, self.ttl)?;
        let header = Header::new(self.key.algorithm());
        let token = jsonwebtoken::encode(&header, &claims, self.key.encoding_key())
            .map_err(|e| TokenError::CreationFailed(e.to_string()))?;
        Ok(IssuedToken { token, claims })
    }
}

/// Verifies tokens and reconstructs the caller's [`Identity`].
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key: SigningKey,
    validation: Validation,
    leeway_secs: u64,
}

impl TokenVerifier {
    pub fn new(key: SigningKey, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(key.algorithm());
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            key,
            validation,
            leeway_secs,
        }
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token against `now` (unix seconds).
    ///
    /// Order: signature and algorithm, then expiry, then the identity claims.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let data =
            jsonwebtoken::decode::<RawClaims>(token, self.key.decoding_key(), &self.validation)
                .map_err(|e| TokenError::Invalid(e.to_string()))?;
        let raw = data.claims;

        if is_expired(raw.exp, now, self.leeway_secs) {
            return Err(TokenError::Expired {
                expired_at: raw.exp,
            });
        }

        let subject = raw
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::MissingClaim { claim: "sub" })?;
        let role: Role = raw
            .role
            .ok_or(TokenError::MissingClaim { claim: "role" })?
            .parse()?;
        let user_id = raw
            .user_id
            .ok_or(TokenError::MissingClaim { claim: "user_id" })?;

        Ok(Identity::new(subject, user_id, role))
    }
}

/// Information about a token (for inspection).
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Algorithm named in the header.
    pub algorithm: String,
    /// Raw claims as JSON.
    pub claims: serde_json::Value,
}

/// Decode a token's header and claims without checking the signature or
/// expiry. Never use the result for access decisions.
pub fn inspect_token_unverified(token: &str) -> Result<TokenInfo, TokenError> {
    let header =
        jsonwebtoken::decode_header(token).map_err(|e| TokenError::Invalid(e.to_string()))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<serde_json::Value>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map_err(|e| TokenError::Invalid(e.to_string()))?;

    Ok(TokenInfo {
        algorithm: format!("{:?}", header.alg),
        claims: data.claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::SigningAlgorithm;
    use jsonwebtoken::EncodingKey;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-with-at-least-32-bytes!!";

    fn key() -> SigningKey {
        SigningKey::from_secret(SECRET, SigningAlgorithm::HS256)
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(key(), std::time::Duration::from_secs(30 * 60))
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(key(), 0)
    }

    fn sign_raw(payload: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let identity = Identity::new("alice", 1, Role::Admin);
        let issued = issuer().issue(&identity).unwrap();
        assert!(!issued.token.is_empty());

        let verified = verifier().verify(&issued.token).unwrap();
        assert_eq!(verified, identity);
        assert_eq!(issued.claims.exp - issued.claims.iat, 30 * 60);
    }

    #[test]
    fn test_expired_token_with_valid_signature() {
        let identity = Identity::new("alice", 1, Role::Client);
        let two_hours_ago = Utc::now() - Duration::hours(2);
        let issued = issuer().issue_at(&identity, two_hours_ago).unwrap();

        let err = verifier().verify(&issued.token).unwrap_err();
        assert!(err.is_expired(), "expected expiry, got {err:?}");
    }

    #[test]
    fn test_huge_ttl_fails_instead_of_panicking() {
        let secs_in_300k_years = 300_000 * 366 * 24 * 3600;
        let issuer = TokenIssuer::new(key(), std::time::Duration::from_secs(secs_in_300k_years));
        let err = issuer.issue(&Identity::new("alice", 1, Role::Client)).unwrap_err();
        assert!(matches!(err, TokenError::CreationFailed(_)), "{err:?}");
    }

    #[test]
    fn test_leeway_extends_validity() {
        let identity = Identity::new("alice", 1, Role::Client);
        let issued = issuer().issue(&identity).unwrap();
        let just_after = issued.claims.exp + 10;

        assert!(verifier().verify_at(&issued.token, just_after).unwrap_err().is_expired());
        assert!(TokenVerifier::new(key(), 30).verify_at(&issued.token, just_after).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let identity = Identity::new("alice", 1, Role::Admin);
        let other = SigningKey::from_secret(
            b"another-secret-with-32-bytes-or-more",
            SigningAlgorithm::HS256,
        );
        let issued = TokenIssuer::new(other, std::time::Duration::from_secs(60))
            .issue(&identity)
            .unwrap();

        let err = verifier().verify(&issued.token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let identity = Identity::new("mallory", 9, Role::Client);
        let issued = issuer().issue(&identity).unwrap();

        // Swap in the payload of an admin token signed by someone else.
        let forged = sign_raw(json!({
            "sub": "mallory",
            "role": "admin",
            "user_id": 9,
            "exp": issued.claims.exp,
        }));
        let mut parts: Vec<&str> = issued.token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        let err = verifier().verify(&tampered).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_algorithm_mismatch_is_invalid() {
        let identity = Identity::new("alice", 1, Role::Client);
        let hs512 = SigningKey::from_secret(SECRET, SigningAlgorithm::HS512);
        let issued = TokenIssuer::new(hs512, std::time::Duration::from_secs(60))
            .issue(&identity)
            .unwrap();

        assert!(matches!(
            verifier().verify(&issued.token).unwrap_err(),
            TokenError::Invalid(_)
        ));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign_raw(json!({"sub": "eve", "role": "superuser", "user_id": 4, "exp": exp}));

        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::UnknownRole(_)));
    }

    #[test]
    fn test_missing_user_id_is_rejected() {
        let exp = Utc::now().timestamp() + 600;
        let token = sign_raw(json!({"sub": "eve", "role": "client", "exp": exp}));

        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::MissingClaim { claim: "user_id" }));
    }

    #[test]
    fn test_missing_exp_is_rejected() {
        let token = sign_raw(json!({"sub": "eve", "role": "client", "user_id": 4}));
        assert!(matches!(
            verifier().verify(&token).unwrap_err(),
            TokenError::Invalid(_)
        ));
    }

    #[test]
    fn test_garbage_is_invalid() {
        for token in ["", "not-a-token", "a.b.c", "Bearer xyz"] {
            assert!(
                matches!(verifier().verify(token), Err(TokenError::Invalid(_))),
                "{token:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_inspect_unverified() {
        let identity = Identity::new("carol", 12, Role::Client);
        let issued = issuer().issue(&identity).unwrap();

        let info = inspect_token_unverified(&issued.token).unwrap();
        assert_eq!(info.algorithm, "HS256");
        assert_eq!(info.claims["sub"], "carol");
        assert_eq!(info.claims["user_id"], 12);
        assert_eq!(info.claims["role"], "client");
    }
}
