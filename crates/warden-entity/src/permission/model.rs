//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single grantable capability identified by its code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Unique code, e.g. `view_user`.
    pub code: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Active flag.
    pub active: bool,
    /// When the permission was last updated.
    pub updated_at: DateTime<Utc>,
}
