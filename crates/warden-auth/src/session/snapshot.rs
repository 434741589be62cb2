//! Active-only projection of a user's roles, permissions and tenants.

use std::collections::BTreeSet;

use uuid::Uuid;
use warden_entity::User;

/// What a token grants, computed from a fully loaded [`User`].
///
/// Filtering cascades: an inactive role hides all of its permissions even
/// when they are individually active, and an inactive tenant is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessSnapshot {
    pub user_id: Uuid,
    pub is_superuser: bool,
    pub permissions: BTreeSet<String>,
    pub tenants: BTreeSet<String>,
}

impl AccessSnapshot {
    /// Projects `user` down to its active grants.
    ///
    /// The user's own active flag is not consulted; callers reject inactive
    /// users before issuing anything.
    pub fn from_user(user: &User) -> Self {
        let permissions = user
            .roles
            .iter()
            .filter(|role| role.active)
            .flat_map(|role| role.permissions.iter())
            .filter(|permission| permission.active)
            .map(|permission| permission.code.clone())
            .collect();

        let tenants = user
            .tenants
            .iter()
            .filter(|tenant| tenant.active)
            .map(|tenant| tenant.name.clone())
            .collect();

        Self {
            user_id: user.id,
            is_superuser: user.is_superuser,
            permissions,
            tenants,
        }
    }
}

impl From<&User> for AccessSnapshot {
    fn from(user: &User) -> Self {
        Self::from_user(user)
    }
}
