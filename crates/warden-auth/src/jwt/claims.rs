//! Claims payload carried by access and refresh tokens.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::session::AccessSnapshot;

/// Signed point-in-time projection of a user.
///
/// Never re-read from storage while the token lives; see the staleness
/// check in [`crate::session::SessionManager::refresh`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Superuser flag at issuance.
    #[serde(rename = "isSuperUser")]
    pub is_superuser: bool,
    /// Codes of active permissions reachable through active roles.
    pub permissions: BTreeSet<String>,
    /// Names of active tenants the user belongs to.
    pub tenants: BTreeSet<String>,
    /// Access or refresh.
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Subject, the user ID.
    pub sub: Uuid,
    /// Issuer, `app_name@app_version`.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Builds the claims for `snapshot`, valid from `now` for `ttl`.
    pub fn new(
        snapshot: &AccessSnapshot,
        kind: TokenKind,
        issuer: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            is_superuser: snapshot.is_superuser,
            permissions: snapshot.permissions.clone(),
            tenants: snapshot.tenants.clone(),
            kind,
            sub: snapshot.user_id,
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the issued-at instant.
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns the expiration instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Whether the token is expired at `now`. Expiry is inclusive.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Whether this is a refresh token.
    pub fn is_refresh(&self) -> bool {
        self.kind == TokenKind::RefreshToken
    }

    /// Whether `code` is among the granted permissions.
    pub fn has_permission(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }

    /// Whether the user belonged to `tenant` at issuance.
    pub fn in_tenant(&self, tenant: &str) -> bool {
        self.tenants.contains(tenant)
    }
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token for protected requests.
    AccessToken,
    /// Long-lived token used only to mint access tokens.
    RefreshToken,
}

impl TokenKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access_token" => Ok(Self::AccessToken),
            "refresh_token" => Ok(Self::RefreshToken),
            other => Err(AuthError::InvalidTokenKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AccessSnapshot {
        AccessSnapshot {
            user_id: Uuid::new_v4(),
            is_superuser: false,
            permissions: ["view_user".to_string()].into(),
            tenants: ["Acme".to_string()].into(),
        }
    }

    #[test]
    fn test_new_sets_window() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new(
            &snapshot(),
            TokenKind::AccessToken,
            "warden@1.0.0",
            now,
            Duration::minutes(15),
        );

        assert_eq!(claims.issued_at(), now);
        assert_eq!(claims.expires_at(), now + Duration::minutes(15));
        assert!(!claims.is_expired_at(now + Duration::minutes(15) - Duration::seconds(1)));
        assert!(claims.is_expired_at(now + Duration::minutes(15)));
        assert!(claims.has_permission("view_user"));
        assert!(claims.in_tenant("Acme"));
        assert!(!claims.is_refresh());
    }

    #[test]
    fn test_wire_field_names() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new(
            &snapshot(),
            TokenKind::RefreshToken,
            "warden@1.0.0",
            now,
            Duration::hours(24),
        );
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["isSuperUser"], false);
        assert_eq!(json["type"], "refresh_token");
        assert_eq!(json["permissions"], serde_json::json!(["view_user"]));
        assert_eq!(json["tenants"], serde_json::json!(["Acme"]));
        assert_eq!(json["iss"], "warden@1.0.0");
        assert_eq!(json["iat"], 1_700_000_000);
        assert_eq!(json["exp"], 1_700_000_000 + 24 * 3600);
    }

    #[test]
    fn test_token_kind_from_str() {
        assert_eq!(
            "access_token".parse::<TokenKind>().unwrap(),
            TokenKind::AccessToken
        );
        assert_eq!(
            "refresh_token".parse::<TokenKind>().unwrap(),
            TokenKind::RefreshToken
        );
        assert!(matches!(
            "id_token".parse::<TokenKind>(),
            Err(AuthError::InvalidTokenKind(kind)) if kind == "id_token"
        ));
    }
}
