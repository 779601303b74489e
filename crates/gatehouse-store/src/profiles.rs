//! Profile records.

use crate::error::StoreError;
use async_trait::async_trait;
use gatehouse_core::{NewProfile, Profile, ProfileUpdate, UserId};

/// Storage for user profiles keyed by integer id.
///
/// Writes must enforce uniqueness of id, email and phone number themselves and
/// report a violation as [`StoreError::Duplicate`]. Callers may pre-check, but
/// the store is the final word.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All profiles, ordered by id.
    async fn list(&self) -> Result<Vec<Profile>, StoreError>;

    async fn get(&self, id: UserId) -> Result<Option<Profile>, StoreError>;

    /// Whether `email` belongs to a profile other than `exclude`.
    async fn email_in_use(&self, email: &str, exclude: Option<UserId>) -> Result<bool, StoreError>;

    async fn insert(&self, profile: NewProfile) -> Result<Profile, StoreError>;

    /// Apply a partial update. `None` when no profile has this id.
    async fn update(&self, id: UserId, update: ProfileUpdate)
    -> Result<Option<Profile>, StoreError>;

    /// Remove a profile. `false` when no profile has this id.
    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;
}
