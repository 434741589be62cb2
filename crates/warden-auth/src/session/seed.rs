//! First superuser creation.

use chrono::{DateTime, Utc};
use tracing::info;
use validator::Validate;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::{NewUser, User};

use crate::error::AuthError;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::store::UserStore;

/// Input for creating a superuser.
#[derive(Debug, Clone)]
pub struct SuperuserSeed {
    pub email: String,
    pub password: String,
    pub phone1: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: String,
}

impl SuperuserSeed {
    /// Seed with the default `Super User` / `super.super` identity.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        phone1: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            phone1: phone1.into(),
            first_name: "Super".to_string(),
            last_name: Some("User".to_string()),
            username: "super.super".to_string(),
        }
    }
}

/// Validates the password with the change-password policy, hashes it and
/// inserts an active superuser.
pub async fn seed_superuser(
    store: &dyn UserStore,
    hasher: &PasswordHasher,
    validator: &PasswordValidator,
    seed: SuperuserSeed,
    now: DateTime<Utc>,
) -> AppResult<User> {
    validator
        .validate(&seed.password)
        .map_err(|e| AppError::from(AuthError::Policy(e)))?;
    let password_hash = hasher.hash_password(&seed.password)?;

    let new_user = NewUser {
        first_name: seed.first_name,
        last_name: seed.last_name,
        username: seed.username,
        email: seed.email,
        password_hash,
        is_superuser: true,
        phone1: seed.phone1,
        phone2: None,
        active: true,
    };
    new_user
        .validate()
        .map_err(|e| AppError::validation(format!("Invalid superuser: {e}")))?;

    let user = store.create_user(new_user, now).await?;
    info!(user_id = %user.id, email = %user.email, "Superuser created");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use warden_core::error::ErrorKind;

    use super::*;
    use crate::store::MemoryUserStore;

    #[tokio::test]
    async fn test_seed_superuser() {
        let store = MemoryUserStore::new();
        let hasher = PasswordHasher::new();
        let seed = SuperuserSeed::new("root@example.com", "Secret1!", "+5511999999999");

        let user = seed_superuser(&store, &hasher, &PasswordValidator::default(), seed, Utc::now())
            .await
            .unwrap();

        assert!(user.is_superuser);
        assert!(user.active);
        assert_eq!(user.username, "super.super");
        assert_eq!(user.first_name, "Super");
        assert!(hasher.verify_password("Secret1!", &user.password_hash));
    }

    #[tokio::test]
    async fn test_seed_rejects_weak_password_and_duplicates() {
        let store = MemoryUserStore::new();
        let hasher = PasswordHasher::new();
        let validator = PasswordValidator::default();

        let weak = SuperuserSeed::new("root@example.com", "secret", "+5511999999999");
        let err = seed_superuser(&store, &hasher, &validator, weak, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.is_empty().await);

        let seed = SuperuserSeed::new("root@example.com", "Secret1!", "+5511999999999");
        seed_superuser(&store, &hasher, &validator, seed.clone(), Utc::now())
            .await
            .unwrap();
        let err = seed_superuser(&store, &hasher, &validator, seed, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
