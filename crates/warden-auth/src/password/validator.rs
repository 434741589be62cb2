//! Password policy enforcement for new passwords.

use warden_core::config::PasswordPolicyConfig;

use crate::error::PolicyError;

/// Shortest accepted password, in characters.
pub const MIN_LENGTH: usize = 8;

/// Longest accepted password, in characters.
pub const MAX_LENGTH: usize = 72;

/// Validates password strength against the configured policy.
///
/// Length bounds are fixed; composition rules and the entropy floor come
/// from [`PasswordPolicyConfig`].
#[derive(Debug, Clone, Default)]
pub struct PasswordValidator {
    policy: PasswordPolicyConfig,
}

impl PasswordValidator {
    /// Creates a new validator from the policy configuration.
    pub fn new(policy: &PasswordPolicyConfig) -> Self {
        Self {
            policy: policy.clone(),
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns the first violation found, checked in this order: length,
    /// uppercase, lowercase, digit, symbol, entropy.
    pub fn validate(&self, password: &str) -> Result<(), PolicyError> {
        let length = password.chars().count();
        if length < MIN_LENGTH {
            return Err(PolicyError::TooShort { min: MIN_LENGTH });
        }
        if length > MAX_LENGTH {
            return Err(PolicyError::TooLong { max: MAX_LENGTH });
        }

        if self.policy.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(PolicyError::MissingUppercase);
        }

        if self.policy.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Err(PolicyError::MissingLowercase);
        }

        if self.policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyError::MissingDigit);
        }

        if self.policy.require_symbol && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(PolicyError::MissingSymbol);
        }

        if self.policy.min_strength_score > 0 {
            let score = u8::from(zxcvbn::zxcvbn(password, &[]).score());
            if score < self.policy.min_strength_score {
                return Err(PolicyError::TooWeak {
                    score,
                    required: self.policy.min_strength_score,
                });
            }
        }

        Ok(())
    }
}
