//! Typed failures of the session and authorization engine.
//!
//! Every variant is terminal for the call that produced it. Messages never
//! carry passwords, key material, or token strings.

use thiserror::Error;

use warden_core::error::{AppError, ErrorKind};

use crate::guard::DenyReason;

/// Result alias for engine operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Password strength violations, reported as the first rule that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Fewer than the minimum number of characters.
    #[error("password must be at least {min} characters long")]
    TooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// More than the maximum number of characters.
    #[error("password must be at most {max} characters long")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,
    #[error("password must contain at least one lowercase letter")]
    MissingLowercase,
    #[error("password must contain at least one digit")]
    MissingDigit,
    #[error("password must contain at least one special character")]
    MissingSymbol,
    /// Entropy estimate below the configured score.
    #[error("password is too weak (score {score}, required {required})")]
    TooWeak {
        /// zxcvbn score of the candidate.
        score: u8,
        /// Configured minimum score.
        required: u8,
    },
}

/// Errors produced by the session manager, token service, password codec
/// and authorization guard.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two cases are never distinguished.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user is inactive")]
    UserInactive,

    #[error("user not found")]
    UserNotFound,

    /// The token could not be parsed or lacks required claims.
    #[error("malformed token")]
    Malformed,

    #[error("token has expired")]
    Expired,

    /// The signature does not verify against the configured public key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// A token kind name other than `access_token` or `refresh_token`.
    #[error("invalid token kind: '{0}'")]
    InvalidTokenKind(String),

    /// A valid token of the wrong kind was presented.
    #[error("wrong token kind: expected {expected}")]
    WrongTokenKind {
        /// The kind the operation accepts.
        expected: &'static str,
    },

    /// The user record changed after the refresh token was issued.
    #[error("token was issued before the last change to the user")]
    StaleToken,

    #[error("access denied: {0}")]
    Denied(#[from] DenyReason),

    #[error("password policy violation: {0}")]
    Policy(#[from] PolicyError),

    /// The hashing primitive failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Key material could not be loaded or used for signing.
    #[error("signing key error: {0}")]
    Key(String),

    /// The user store or another collaborator failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(#[from] AppError),
}

impl AuthError {
    /// Whether the failure is an infrastructure fault rather than a rejection.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Hashing(_) | Self::Key(_) | Self::Infrastructure(_)
        )
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let kind = match &err {
            AuthError::InvalidCredentials
            | AuthError::UserInactive
            | AuthError::Malformed
            | AuthError::Expired
            | AuthError::InvalidSignature
            | AuthError::WrongTokenKind { .. }
            | AuthError::StaleToken => ErrorKind::Authentication,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Denied(DenyReason::RefreshTokenNotAllowed) => ErrorKind::Authentication,
            AuthError::Denied(_) => ErrorKind::Authorization,
            AuthError::InvalidTokenKind(_) | AuthError::Policy(_) => ErrorKind::Validation,
            AuthError::Hashing(_) | AuthError::Key(_) => ErrorKind::Internal,
            AuthError::Infrastructure(inner) => return inner.clone(),
        };
        AppError::new(kind, err.to_string())
    }
}
