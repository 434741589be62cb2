//! In-memory user store for tests and single-process tooling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::{NewUser, User};

use super::UserStore;

/// [`UserStore`] backed by a map behind a Tokio lock.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a fully built user, relations included.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Applies `change` to the user and bumps `updated_at` to `at`.
    ///
    /// Returns `false` when the user does not exist.
    pub async fn modify<F>(&self, id: Uuid, at: DateTime<Utc>, change: F) -> bool
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                change(user);
                user.updated_at = at;
                true
            }
            None => false,
        }
    }

    /// Sets the active flag, bumping `updated_at`.
    pub async fn set_active(&self, id: Uuid, active: bool, at: DateTime<Utc>) -> bool {
        self.modify(id, at, |user| user.active = active).await
    }

    /// Removes a user.
    pub async fn remove(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let hash = password_hash.to_string();
        Ok(self.modify(id, at, |user| user.password_hash = hash).await)
    }

    async fn create_user(&self, new_user: NewUser, at: DateTime<Utc>) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|user| user.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                new_user.email
            )));
        }
        if users.values().any(|user| user.username == new_user.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                new_user.username
            )));
        }

        let user = User {
            id: Uuid::now_v7(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_superuser: new_user.is_superuser,
            phone1: new_user.phone1,
            phone2: new_user.phone2,
            avatar: None,
            active: new_user.active,
            roles: Vec::new(),
            tenants: Vec::new(),
            created_at: at,
            updated_at: at,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use warden_core::error::ErrorKind;

    use super::*;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            first_name: "Super".to_string(),
            last_name: Some("User".to_string()),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            is_superuser: true,
            phone1: "+5511999999999".to_string(),
            phone2: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_case_insensitive() {
        let store = MemoryUserStore::new();
        let created = store
            .create_user(new_user("Root@Example.com", "root"), Utc::now())
            .await
            .unwrap();

        assert_eq!(created.id.get_version_num(), 7);

        let found = store.find_by_email("root@example.COM").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
        assert!(store.find_by_id(created.id).await.unwrap().is_some());
        assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicates_conflict() {
        let store = MemoryUserStore::new();
        store
            .create_user(new_user("a@example.com", "a"), Utc::now())
            .await
            .unwrap();

        let dup_email = store
            .create_user(new_user("A@example.com", "b"), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(dup_email.kind, ErrorKind::Conflict);

        let dup_username = store
            .create_user(new_user("b@example.com", "a"), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(dup_username.kind, ErrorKind::Conflict);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_password_bumps_updated_at() {
        let store = MemoryUserStore::new();
        let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let user = store
            .create_user(new_user("a@example.com", "a"), created_at)
            .await
            .unwrap();

        let later = created_at + chrono::Duration::minutes(5);
        assert!(store.update_password(user.id, "new-hash", later).await.unwrap());

        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert_eq!(stored.updated_at, later);

        assert!(!store.update_password(Uuid::new_v4(), "x", later).await.unwrap());
    }
}
