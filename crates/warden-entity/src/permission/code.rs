//! Permission code value type and the built-in codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A validated permission code: 1 to 50 characters of `[A-Za-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Full administrative access.
    pub const ADMIN: &'static str = "admin";
    /// Read users.
    pub const VIEW_USER: &'static str = "view_user";
    /// Create users.
    pub const CREATE_USER: &'static str = "create_user";
    /// Update users.
    pub const UPDATE_USER: &'static str = "update_user";
    /// Read permissions.
    pub const VIEW_PERMISSION: &'static str = "view_permission";
    /// Create permissions.
    pub const CREATE_PERMISSION: &'static str = "create_permission";
    /// Update permissions.
    pub const UPDATE_PERMISSION: &'static str = "update_permission";
    /// Read roles.
    pub const VIEW_ROLE: &'static str = "view_role";
    /// Create roles.
    pub const CREATE_ROLE: &'static str = "create_role";
    /// Update roles.
    pub const UPDATE_ROLE: &'static str = "update_role";
    /// Read tenants.
    pub const VIEW_TENANT: &'static str = "view_tenant";
    /// Create tenants.
    pub const CREATE_TENANT: &'static str = "create_tenant";
    /// Update tenants.
    pub const UPDATE_TENANT: &'static str = "update_tenant";

    /// Every code the platform ships with.
    pub const BUILT_IN: [&'static str; 13] = [
        Self::ADMIN,
        Self::VIEW_USER,
        Self::CREATE_USER,
        Self::UPDATE_USER,
        Self::VIEW_PERMISSION,
        Self::CREATE_PERMISSION,
        Self::UPDATE_PERMISSION,
        Self::VIEW_ROLE,
        Self::CREATE_ROLE,
        Self::UPDATE_ROLE,
        Self::VIEW_TENANT,
        Self::CREATE_TENANT,
        Self::UPDATE_TENANT,
    ];

    /// Maximum code length, matching the `permissions.code` column.
    pub const MAX_LEN: usize = 50;

    /// Parses and validates a code.
    pub fn parse(code: &str) -> Result<Self, warden_core::AppError> {
        if code.is_empty() || code.len() > Self::MAX_LEN {
            return Err(warden_core::AppError::validation(format!(
                "Permission code must be 1 to {} characters long",
                Self::MAX_LEN
            )));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(warden_core::AppError::validation(format!(
                "Invalid permission code: '{code}'. Only letters, digits and '_' are allowed"
            )));
        }
        Ok(Self(code.to_string()))
    }

    /// Return the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the built-in codes.
    pub fn is_built_in(&self) -> bool {
        Self::BUILT_IN.contains(&self.0.as_str())
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PermissionCode {
    type Err = warden_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionCode {
    type Error = warden_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PermissionCode> for String {
    fn from(code: PermissionCode) -> Self {
        code.0
    }
}

impl AsRef<str> for PermissionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let code: PermissionCode = "view_user".parse().unwrap();
        assert_eq!(code.as_str(), "view_user");
        assert!(code.is_built_in());
        assert!(!PermissionCode::parse("export_reports").unwrap().is_built_in());
    }

    #[test]
    fn test_parse_rejects_bad_characters() {
        assert!(PermissionCode::parse("").is_err());
        assert!(PermissionCode::parse("view-user").is_err());
        assert!(PermissionCode::parse("view user").is_err());
        assert!(PermissionCode::parse(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_built_in_codes_are_valid() {
        for code in PermissionCode::BUILT_IN {
            assert!(PermissionCode::parse(code).is_ok(), "{code}");
        }
    }

    #[test]
    fn test_serde_validates() {
        let ok: PermissionCode = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(ok.as_str(), PermissionCode::ADMIN);
        assert!(serde_json::from_str::<PermissionCode>("\"no spaces\"").is_err());
    }
}
