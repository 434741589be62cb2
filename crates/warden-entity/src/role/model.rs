//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permission::Permission;

/// A named bundle of permissions. An inactive role grants nothing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: Uuid,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Active flag.
    pub active: bool,
    /// Permissions attached to the role.
    #[sqlx(skip)]
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}
