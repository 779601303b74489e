//! Caller identity and access tiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric user id. Shared by the issuer's credential records and the users
/// service's profile records.
pub type UserId = i64;

/// Access tier assigned at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role string that is not one of the known tiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "client" => Ok(Role::Client),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A verified caller: subject name, numeric id and role.
///
/// Built only from a validated token (or from a freshly issued one). Ownership
/// decisions use `user_id`, never `subject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject: String,
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn new(subject: impl Into<String>, user_id: UserId, role: Role) -> Self {
        Self {
            subject: subject.into(),
            user_id,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// True when the record with id `target` belongs to this caller.
    pub fn owns(&self, target: UserId) -> bool {
        self.user_id == target
    }
}
