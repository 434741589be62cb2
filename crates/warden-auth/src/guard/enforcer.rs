//! The authorization decision applied to every protected request.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::AuthError;
use crate::jwt::Claims;

use super::decision::{Decision, DenyReason};
use super::requirement::Requirement;

/// Stateless guard over verified claims. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    /// Creates a new guard.
    pub fn new() -> Self {
        Self
    }

    /// Decides whether `claims` satisfy the requirement.
    ///
    /// Checks run in a fixed order:
    ///
    /// 1. Refresh tokens are denied outright
    /// 2. Superusers are allowed, skipping tenant and permission checks
    /// 3. A required tenant must be among the claimed tenants
    /// 4. No required permissions means any access token passes
    /// 5. Otherwise at least one required permission must be claimed
    pub fn decide(
        &self,
        claims: &Claims,
        required_permissions: &BTreeSet<String>,
        required_tenant: Option<&str>,
    ) -> Decision {
        if claims.is_refresh() {
            return Decision::Deny(DenyReason::RefreshTokenNotAllowed);
        }

        if claims.is_superuser {
            return Decision::Allow;
        }

        if let Some(tenant) = required_tenant
            && !claims.in_tenant(tenant)
        {
            return Decision::Deny(DenyReason::TenantForbidden);
        }

        if required_permissions.is_empty() {
            return Decision::Allow;
        }

        if required_permissions
            .iter()
            .any(|code| claims.has_permission(code))
        {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::PermissionForbidden)
        }
    }

    /// Like [`decide`](Self::decide) but takes a [`Requirement`] and returns
    /// a denial as [`AuthError::Denied`].
    pub fn require(&self, claims: &Claims, requirement: &Requirement) -> Result<(), AuthError> {
        let decision = self.decide(claims, requirement.permissions(), requirement.tenant());
        decision.into_result().map_err(|reason| {
            debug!(
                user_id = %claims.sub,
                reason = %reason,
                tenant = ?requirement.tenant(),
                "Access denied"
            );
            AuthError::Denied(reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};
    use uuid::Uuid;

    use super::*;
    use crate::jwt::TokenKind;
    use crate::session::AccessSnapshot;

    fn claims(kind: TokenKind, superuser: bool, permissions: &[&str], tenants: &[&str]) -> Claims {
        let snapshot = AccessSnapshot {
            user_id: Uuid::new_v4(),
            is_superuser: superuser,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            tenants: tenants.iter().map(|t| t.to_string()).collect(),
        };
        Claims::new(
            &snapshot,
            kind,
            "warden@test",
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            Duration::minutes(15),
        )
    }

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_refresh_token_denied_even_for_superuser() {
        let guard = AccessGuard::new();
        let refresh = claims(TokenKind::RefreshToken, true, &[], &[]);
        assert_eq!(
            guard.decide(&refresh, &set(&[]), None),
            Decision::Deny(DenyReason::RefreshTokenNotAllowed)
        );
    }

    #[test]
    fn test_superuser_bypasses_tenant_and_permissions() {
        let guard = AccessGuard::new();
        let root = claims(TokenKind::AccessToken, true, &[], &[]);
        assert_eq!(
            guard.decide(&root, &set(&["admin", "view_user"]), Some("Other")),
            Decision::Allow
        );
    }

    #[test]
    fn test_tenant_checked_before_permissions() {
        let guard = AccessGuard::new();
        let user = claims(TokenKind::AccessToken, false, &["view_user"], &["Acme"]);

        assert_eq!(
            guard.decide(&user, &set(&[]), Some("Other")),
            Decision::Deny(DenyReason::TenantForbidden)
        );
        assert_eq!(
            guard.decide(&user, &set(&["view_user"]), Some("Other")),
            Decision::Deny(DenyReason::TenantForbidden)
        );
        assert_eq!(guard.decide(&user, &set(&[]), Some("Acme")), Decision::Allow);
    }

    #[test]
    fn test_permission_intersection() {
        let guard = AccessGuard::new();
        let user = claims(TokenKind::AccessToken, false, &["view_user"], &[]);

        assert_eq!(guard.decide(&user, &set(&[]), None), Decision::Allow);
        assert_eq!(
            guard.decide(&user, &set(&["admin", "view_user"]), None),
            Decision::Allow
        );
        assert_eq!(
            guard.decide(&user, &set(&["admin"]), None),
            Decision::Deny(DenyReason::PermissionForbidden)
        );
    }

    #[test]
    fn test_require_maps_denial() {
        let guard = AccessGuard::new();
        let user = claims(TokenKind::AccessToken, false, &[], &["Acme"]);

        assert!(guard.require(&user, &Requirement::authenticated()).is_ok());
        assert!(matches!(
            guard.require(&user, &Requirement::any_of(["create_user"])),
            Err(AuthError::Denied(DenyReason::PermissionForbidden))
        ));
    }
}
