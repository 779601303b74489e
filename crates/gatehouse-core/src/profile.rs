//! Profile records guarded by the users service.

use crate::identity::UserId;
use serde::{Deserialize, Deserializer, Serialize};

/// A stored user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Payload for creating a profile. The caller chooses the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Partial update payload.
///
/// A field that is absent from the payload leaves the stored value alone.
/// For the nullable fields, an explicit `null` clears the stored value, which
/// is why they are `Option<Option<_>>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("id must be a positive integer")]
    InvalidId,

    #[error("full_name must not be empty")]
    EmptyFullName,

    #[error("email is not a valid address: {0:?}")]
    InvalidEmail(String),
}

impl Profile {
    /// Apply a partial update in place. Only fields present in `update` change.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone_number) = update.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
    }
}

impl NewProfile {
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.id <= 0 {
            return Err(ProfileValidationError::InvalidId);
        }
        validate_full_name(&self.full_name)?;
        validate_email(&self.email)
    }
}

impl From<NewProfile> for Profile {
    fn from(p: NewProfile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            phone_number: p.phone_number,
            address: p.address,
        }
    }
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if let Some(full_name) = &self.full_name {
            validate_full_name(full_name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
    }
}

fn validate_full_name(full_name: &str) -> Result<(), ProfileValidationError> {
    if full_name.trim().is_empty() {
        return Err(ProfileValidationError::EmptyFullName);
    }
    Ok(())
}

/// Shape check only: `local@domain.tld`, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ProfileValidationError> {
    let invalid = || ProfileValidationError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    match domain.split_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !domain.ends_with('.') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}
