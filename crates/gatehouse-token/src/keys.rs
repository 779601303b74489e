//! Shared-secret signing keys.

use crate::error::TokenError;
use gatehouse_core::{SigningAlgorithm, TokenConfig};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

/// Secrets shorter than this are accepted but logged as weak.
const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// HMAC key material plus the algorithm it is used with.
///
/// Only services that issue or verify tokens hold one of these.
#[derive(Clone)]
pub struct SigningKey {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// Build a key from raw secret bytes.
    pub fn from_secret(secret: &[u8], algorithm: SigningAlgorithm) -> Self {
        if secret.len() < MIN_RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                len = secret.len(),
                "token signing secret is shorter than {MIN_RECOMMENDED_SECRET_LEN} bytes"
            );
        }
        Self {
            algorithm: jwt_algorithm(algorithm),
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Resolve the secret (env, then file) and algorithm from configuration.
    pub fn from_config(config: &TokenConfig) -> Result<Self, TokenError> {
        let secret = config.resolve_secret()?;
        Ok(Self::from_secret(secret.as_bytes(), config.algorithm))
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

fn jwt_algorithm(algorithm: SigningAlgorithm) -> Algorithm {
    match algorithm {
        SigningAlgorithm::HS256 => Algorithm::HS256,
        SigningAlgorithm::HS384 => Algorithm::HS384,
        SigningAlgorithm::HS512 => Algorithm::HS512,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_mapping() {
        let key =
            SigningKey::from_secret(b"0123456789abcdef0123456789abcdef", SigningAlgorithm::HS384);
        assert_eq!(key.algorithm(), Algorithm::HS384);
    }

    #[test]
    fn test_from_config_without_secret_fails() {
        let config = TokenConfig {
            secret_env: "GATEHOUSE_TEST_SECRET_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let err = SigningKey::from_config(&config).unwrap_err();
        assert!(matches!(err, TokenError::Config(_)));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let key =
            SigningKey::from_secret(b"super-secret-material-for-testing", SigningAlgorithm::HS256);
        let printed = format!("{key:?}");
        assert!(!printed.contains("super-secret"));
    }
}
