//! What a protected route demands of its caller.

use std::collections::BTreeSet;

use warden_entity::PermissionCode;

/// Permissions (any one suffices) and an optional tenant a route requires.
///
/// An empty permission set means the route only needs a valid access token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirement {
    permissions: BTreeSet<String>,
    tenant: Option<String>,
}

impl Requirement {
    /// Any authenticated caller.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Callers holding at least one of `codes`.
    pub fn any_of<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: codes.into_iter().map(Into::into).collect(),
            tenant: None,
        }
    }

    /// Callers holding `code`.
    pub fn permission(code: &PermissionCode) -> Self {
        Self::any_of([code.as_str()])
    }

    /// Restricts the requirement to members of `tenant`.
    pub fn in_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let req = Requirement::any_of(["view_user", "admin"]).in_tenant("Acme");
        assert_eq!(req.permissions().len(), 2);
        assert_eq!(req.tenant(), Some("Acme"));

        let open = Requirement::authenticated();
        assert!(open.permissions().is_empty());
        assert_eq!(open.tenant(), None);

        let code = PermissionCode::parse("view_role").unwrap();
        assert!(Requirement::permission(&code).permissions().contains("view_role"));
    }
}
