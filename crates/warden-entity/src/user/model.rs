//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::role::Role;
use crate::tenant::Tenant;

/// A registered user together with its eagerly loaded relations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name (optional).
    pub last_name: Option<String>,
    /// Unique login name.
    pub username: String,
    /// Unique email address, used as the login identifier.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Bypasses every permission and tenant check.
    pub is_superuser: bool,
    /// Primary phone number (E.164).
    pub phone1: String,
    /// Secondary phone number (E.164).
    pub phone2: Option<String>,
    /// Object key of the avatar image.
    pub avatar: Option<String>,
    /// Inactive users can neither log in nor refresh.
    pub active: bool,
    /// Roles granted to the user, with their permissions.
    #[sqlx(skip)]
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Tenants the user belongs to.
    #[sqlx(skip)]
    #[serde(default)]
    pub tenants: Vec<Tenant>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// Bumped by every write to the user record, relations included.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    /// Given name.
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    /// Family name (optional).
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    /// Desired username.
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Pre-hashed password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Primary phone number.
    #[validate(length(min = 8, max = 20))]
    pub phone1: String,
    /// Secondary phone number.
    #[validate(length(min = 8, max = 20))]
    pub phone2: Option<String>,
    /// Initial active flag.
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            first_name: "Super".to_string(),
            last_name: Some("User".to_string()),
            username: "super.super".to_string(),
            email: "root@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            is_superuser: true,
            phone1: "+5511999999999".to_string(),
            phone2: None,
            active: true,
        }
    }

    #[test]
    fn test_new_user_validation() {
        assert!(new_user().validate().is_ok());

        let mut bad_email = new_user();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_username = new_user();
        short_username.username = "ab".to_string();
        assert!(short_username.validate().is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(new_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "root@example.com");
    }
}
