//! Tenant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An organizational scope a user may belong to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    /// Unique tenant identifier.
    pub id: Uuid,
    /// Unique tenant name, the value carried in token claims.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Tenant home page.
    pub url: Option<String>,
    /// Object key of the tenant logo.
    pub logo: Option<String>,
    /// Active flag.
    pub active: bool,
    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}
