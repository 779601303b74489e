//! In-memory store, selected with `database_url = "memory"`.
//!
//! Each table sits behind one write lock, so the uniqueness check and the
//! insert happen as a single step.

use crate::credentials::{CredentialRecord, CredentialStore, NewCredential};
use crate::error::{StoreError, UniqueField};
use crate::profiles::ProfileStore;
use async_trait::async_trait;
use chrono::Utc;
use gatehouse_core::{NewProfile, Profile, ProfileUpdate, UserId};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct CredentialTable {
    next_id: UserId,
    rows: Vec<CredentialRecord>,
}

/// Volatile store for both credentials and profiles.
#[derive(Debug, Default)]
pub struct MemoryStore {
    credentials: RwLock<CredentialTable>,
    profiles: RwLock<BTreeMap<UserId, Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, StoreError> {
        let mut table = self.credentials.write().await;
        if table.rows.iter().any(|r| r.username == credential.username) {
            return Err(StoreError::Duplicate(UniqueField::Username));
        }
        table.next_id += 1;
        let record = CredentialRecord {
            id: table.next_id,
            username: credential.username,
            password_hash: credential.password_hash,
            role: credential.role,
            created_at: Utc::now(),
        };
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let table = self.credentials.read().await;
        Ok(table.rows.iter().find(|r| r.username == username).cloned())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.credentials.read().await.rows.len() as u64)
    }
}

/// First unique field of `candidate` already held by a profile other than `skip`.
fn conflicting_field(
    profiles: &BTreeMap<UserId, Profile>,
    candidate: &Profile,
    skip: Option<UserId>,
) -> Option<UniqueField> {
    profiles
        .values()
        .filter(|p| Some(p.id) != skip)
        .find_map(|p| {
            if p.email == candidate.email {
                Some(UniqueField::Email)
            } else if candidate.phone_number.is_some() && p.phone_number == candidate.phone_number {
                Some(UniqueField::PhoneNumber)
            } else {
                None
            }
        })
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(self.profiles.read().await.values().cloned().collect())
    }

    async fn get(&self, id: UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn email_in_use(&self, email: &str, exclude: Option<UserId>) -> Result<bool, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .any(|p| p.email == email && Some(p.id) != exclude))
    }

    async fn insert(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.id) {
            return Err(StoreError::Duplicate(UniqueField::ProfileId));
        }
        let profile = Profile::from(profile);
        if let Some(field) = conflicting_field(&profiles, &profile, None) {
            return Err(StoreError::Duplicate(field));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, StoreError> {
        let mut profiles = self.profiles.write().await;
        let Some(current) = profiles.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        updated.apply(update);
        if let Some(field) = conflicting_field(&profiles, &updated, Some(id)) {
            return Err(StoreError::Duplicate(field));
        }
        profiles.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.profiles.write().await.remove(&id).is_some())
    }
}
