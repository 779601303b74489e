//! Profile operations behind the access rules.
//!
//! Every method authorizes first, then validates input, then touches the
//! store. A forbidden caller therefore never learns whether a record exists.

use crate::error::UsersError;
use gatehouse_core::{Identity, NewProfile, Profile, ProfileUpdate, UserId};
use gatehouse_policy::{ProfileOperation, authorize};
use gatehouse_store::{ProfileStore, UniqueField};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: UserId,
}

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller: &Identity) -> Result<Vec<Profile>, UsersError> {
        authorize(caller, ProfileOperation::List)?;
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, caller: &Identity, id: UserId) -> Result<Profile, UsersError> {
        authorize(caller, ProfileOperation::View(id))?;
        self.store.get(id).await?.ok_or(UsersError::NotFound)
    }

    pub async fn create(
        &self,
        caller: &Identity,
        profile: NewProfile,
    ) -> Result<Profile, UsersError> {
        authorize(caller, ProfileOperation::Create)?;
        profile.validate()?;

        if self.store.get(profile.id).await?.is_some() {
            return Err(UsersError::Conflict(UniqueField::ProfileId));
        }
        if self.store.email_in_use(&profile.email, None).await? {
            return Err(UsersError::Conflict(UniqueField::Email));
        }

        let created = self.store.insert(profile).await?;
        tracing::info!(id = created.id, by = caller.user_id, "created profile");
        Ok(created)
    }

    pub async fn update(
        &self,
        caller: &Identity,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<Profile, UsersError> {
        authorize(caller, ProfileOperation::Update(id))?;
        update.validate()?;

        if self.store.get(id).await?.is_none() {
            return Err(UsersError::NotFound);
        }
        if let Some(email) = &update.email
            && self.store.email_in_use(email, Some(id)).await?
        {
            return Err(UsersError::Conflict(UniqueField::Email));
        }

        let updated = self
            .store
            .update(id, update)
            .await?
            .ok_or(UsersError::NotFound)?;
        tracing::info!(id, by = caller.user_id, "updated profile");
        Ok(updated)
    }

    pub async fn delete(
        &self,
        caller: &Identity,
        id: UserId,
    ) -> Result<DeleteResponse, UsersError> {
        authorize(caller, ProfileOperation::Delete(id))?;

        if !self.store.delete(id).await? {
            return Err(UsersError::NotFound);
        }
        tracing::info!(id, by = caller.user_id, "deleted profile");
        Ok(DeleteResponse {
            message: "User deleted successfully".to_string(),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::Role;
    use gatehouse_policy::AccessError;
    use gatehouse_store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(MemoryStore::new()))
    }

    fn admin() -> Identity {
        Identity::new("admin", 1, Role::Admin)
    }

    fn client(id: UserId) -> Identity {
        Identity::new(format!("user{id}"), id, Role::Client)
    }

    fn new_profile(id: UserId, email: &str) -> NewProfile {
        NewProfile {
            id,
            full_name: "A".to_string(),
            email: email.to_string(),
            phone_number: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_partial_update_keeps_email() {
        let service = service();
        service.create(&admin(), new_profile(5, "a@x.com")).await.unwrap();

        let updated = service
            .update(
                &client(5),
                5,
                ProfileUpdate {
                    full_name: Some("B".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "B");
        assert_eq!(updated.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_on_create() {
        let service = service();
        service.create(&admin(), new_profile(1, "same@x.com")).await.unwrap();
        let err = service
            .create(&admin(), new_profile(2, "same@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, UsersError::Conflict(UniqueField::Email)));
    }

    #[tokio::test]
    async fn test_update_may_keep_own_email() {
        let service = service();
        service.create(&admin(), new_profile(1, "one@x.com")).await.unwrap();
        service.create(&admin(), new_profile(2, "two@x.com")).await.unwrap();

        let same = ProfileUpdate {
            email: Some("one@x.com".to_string()),
            ..Default::default()
        };
        assert!(service.update(&admin(), 1, same.clone()).await.is_ok());
        assert!(matches!(
            service.update(&admin(), 2, same).await,
            Err(UsersError::Conflict(UniqueField::Email))
        ));
    }

    #[tokio::test]
    async fn test_forbidden_before_not_found() {
        let service = service();
        let err = service.get(&client(3), 99).await.unwrap_err();
        assert!(matches!(err, UsersError::Access(AccessError::Forbidden(_))));

        let err = service.get(&admin(), 99).await.unwrap_err();
        assert!(matches!(err, UsersError::NotFound));
    }

    #[tokio::test]
    async fn test_client_cannot_list_or_create() {
        let service = service();
        assert!(matches!(
            service.list(&client(2)).await,
            Err(UsersError::Access(AccessError::Forbidden(_)))
        ));
        assert!(matches!(
            service.create(&client(2), new_profile(2, "me@x.com")).await,
            Err(UsersError::Access(AccessError::Forbidden(_)))
        ));
    }

    #[tokio::test]
    async fn test_validation() {
        let service = service();
        let mut bad = new_profile(1, "not-an-email");
        assert!(matches!(
            service.create(&admin(), bad.clone()).await,
            Err(UsersError::Validation(_))
        ));
        bad.email = "ok@x.com".to_string();
        bad.full_name = "  ".to_string();
        assert!(matches!(
            service.create(&admin(), bad).await,
            Err(UsersError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = service();
        service.create(&admin(), new_profile(5, "five@x.com")).await.unwrap();

        let deleted = service.delete(&admin(), 5).await.unwrap();
        assert_eq!(
            deleted,
            DeleteResponse {
                message: "User deleted successfully".to_string(),
                id: 5
            }
        );
        assert!(matches!(
            service.delete(&admin(), 5).await,
            Err(UsersError::NotFound)
        ));
    }
}
