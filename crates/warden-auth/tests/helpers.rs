//! Shared fixtures for warden-auth integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use warden_auth::{
    JwtDecoder, JwtEncoder, KeyPair, MemoryUserStore, PasswordHasher, PasswordValidator,
    SessionManager, UserStore,
};
use warden_core::config::{AuthConfig, PasswordPolicyConfig};
use warden_core::traits::{Clock, ManualClock};
use warden_entity::{Permission, Role, Tenant, User};

pub const ISSUER_PRIVATE: &str = include_str!("fixtures/issuer_private.pem");
pub const ISSUER_PUBLIC: &str = include_str!("fixtures/issuer_public.pem");

pub const PASSWORD: &str = "Secret1!";

/// 2023-11-14T22:13:20Z
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn auth_config() -> AuthConfig {
    serde_json::from_value(serde_json::json!({
        "app_name": "warden",
        "app_version": "1.0.0",
        "public_key_path": "tests/fixtures/issuer_public.pem",
        "access_token_ttl_minutes": 15,
        "refresh_token_ttl_hours": 24,
        "store_timeout_seconds": 5,
    }))
    .unwrap()
}

pub fn keys() -> Arc<KeyPair> {
    Arc::new(
        KeyPair::from_pem(
            Some(ISSUER_PRIVATE.as_bytes()),
            ISSUER_PUBLIC.as_bytes(),
        )
        .unwrap(),
    )
}

/// A session manager over an in-memory store and a manual clock at [`t0`].
pub struct TestEngine {
    pub store: MemoryUserStore,
    pub clock: ManualClock,
    pub decoder: Arc<JwtDecoder>,
    pub hasher: Arc<PasswordHasher>,
    pub manager: SessionManager,
}

impl TestEngine {
    pub fn new() -> Self {
        let store = MemoryUserStore::new();
        Self::with_store(store.clone(), Arc::new(store))
    }

    /// Builds an engine whose manager talks to `backend` instead of the
    /// in-memory store.
    pub fn with_store(store: MemoryUserStore, backend: Arc<dyn UserStore>) -> Self {
        let config = auth_config();
        let keys = keys();
        let clock = ManualClock::new(t0());
        let encoder = Arc::new(JwtEncoder::new(&config, keys.clone()).unwrap());
        let decoder = Arc::new(JwtDecoder::new(keys));
        let hasher = Arc::new(PasswordHasher::new());
        let validator = Arc::new(PasswordValidator::new(&PasswordPolicyConfig::default()));

        let manager = SessionManager::new(
            backend,
            encoder,
            decoder.clone(),
            hasher.clone(),
            validator,
            Arc::new(clock.clone()) as Arc<dyn Clock>,
            config.store_timeout(),
        );

        Self {
            store,
            clock,
            decoder,
            hasher,
            manager,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Stores `user` with [`PASSWORD`] as its password and returns its ID.
    pub async fn add_user(&self, mut user: User) -> Uuid {
        user.password_hash = self.hasher.hash_password(PASSWORD).unwrap();
        let id = user.id;
        self.store.insert(user).await;
        id
    }
}

pub fn permission(code: &str, active: bool) -> Permission {
    Permission {
        id: Uuid::new_v4(),
        code: code.to_string(),
        description: None,
        active,
        updated_at: t0() - Duration::days(30),
    }
}

pub fn role(name: &str, active: bool, permissions: Vec<Permission>) -> Role {
    Role {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        active,
        permissions,
        updated_at: t0() - Duration::days(30),
    }
}

pub fn tenant(name: &str, active: bool) -> Tenant {
    Tenant {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        url: None,
        logo: None,
        active,
        updated_at: t0() - Duration::days(30),
    }
}

/// An active, non-superuser user last updated a day before [`t0`].
pub fn user(email: &str) -> User {
    let created = t0() - Duration::days(1);
    User {
        id: Uuid::new_v4(),
        first_name: "Ada".to_string(),
        last_name: Some("Lovelace".to_string()),
        username: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        is_superuser: false,
        phone1: "+5511999999999".to_string(),
        phone2: None,
        avatar: None,
        active: true,
        roles: Vec::new(),
        tenants: Vec::new(),
        created_at: created,
        updated_at: created,
    }
}

/// The user from the login-success scenario: one active role granting
/// `view_user`.
pub fn viewer(email: &str) -> User {
    User {
        roles: vec![role("viewer", true, vec![permission("view_user", true)])],
        ..user(email)
    }
}
