//! Outcome of an authorization check.

use serde::Serialize;
use thiserror::Error;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// A refresh token was presented to a protected resource.
    #[error("refresh tokens cannot access protected resources")]
    RefreshTokenNotAllowed,
    /// The token does not carry the required tenant.
    #[error("tenant not allowed")]
    TenantForbidden,
    /// None of the required permissions is granted.
    #[error("missing required permission")]
    PermissionForbidden,
}

/// Allow or deny, with the reason for a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts a denial into an error.
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        assert_eq!(Decision::Allow.into_result(), Ok(()));
        assert_eq!(
            Decision::Deny(DenyReason::TenantForbidden).into_result(),
            Err(DenyReason::TenantForbidden)
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Decision::Deny(DenyReason::PermissionForbidden)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"decision": "deny", "reason": "permission_forbidden"})
        );
        let json = serde_json::to_value(Decision::Allow).unwrap();
        assert_eq!(json, serde_json::json!({"decision": "allow"}));
    }
}
