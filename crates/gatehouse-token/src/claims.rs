//! Token claims.

use crate::error::TokenError;
use chrono::{DateTime, Duration, TimeZone, Utc};
use gatehouse_core::{Identity, Role, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims written into every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username at issuance.
    pub sub: String,

    pub role: Role,

    /// Numeric id; the ownership checks compare against this, never `sub`.
    pub user_id: UserId,

    /// Issued at (unix seconds).
    pub iat: i64,

    /// Expiry (unix seconds).
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl TokenClaims {
    /// Claims for `identity`, valid from `issued_at` for `ttl`.
    pub fn new(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::CreationFailed(format!("lifetime {ttl} overflows the expiry time"))
        })?;
        Ok(Self {
            sub: identity.subject.clone(),
            role: identity.role,
            user_id: identity.user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        })
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.user_id, self.role)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

}

pub(crate) fn is_expired(exp: i64, now: i64, leeway_secs: u64) -> bool {
    let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
    now > exp.saturating_add(leeway)
}

/// Wire shape used while decoding. Everything optional so that a missing claim
/// is reported by name after the expiry check.
#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub exp: i64,
}
