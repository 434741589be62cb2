//! The user lookup collaborator consumed by the session manager.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_entity::{NewUser, User};

pub use memory::MemoryUserStore;

/// Storage of users with their roles, permissions and tenants.
///
/// Lookups return the user with every relation eagerly loaded, inactive
/// entries included; filtering is the caller's job. Soft-deleted rows are
/// never returned.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Finds a user by email, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Finds a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Replaces the password hash and sets `updated_at` to `at`.
    ///
    /// Returns `false` when no such user exists.
    async fn update_password(&self, id: Uuid, password_hash: &str, at: DateTime<Utc>)
    -> AppResult<bool>;

    /// Inserts a user. Duplicate email or username is a conflict.
    async fn create_user(&self, user: NewUser, at: DateTime<Utc>) -> AppResult<User>;
}
