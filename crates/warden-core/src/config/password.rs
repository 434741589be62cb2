//! Password policy configuration.

use serde::{Deserialize, Serialize};

/// Composition rules applied on top of the fixed 8..=72 character bounds.
///
/// The same policy runs for superuser seeding and for change-password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicyConfig {
    /// Require at least one uppercase letter.
    #[serde(default = "default_true")]
    pub require_uppercase: bool,
    /// Require at least one lowercase letter.
    #[serde(default = "default_true")]
    pub require_lowercase: bool,
    /// Require at least one ASCII digit.
    #[serde(default = "default_true")]
    pub require_digit: bool,
    /// Require at least one non-alphanumeric character.
    #[serde(default = "default_true")]
    pub require_symbol: bool,
    /// Minimum zxcvbn score (0-4). 0 disables the entropy check.
    #[serde(default)]
    pub min_strength_score: u8,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
            min_strength_score: 0,
        }
    }
}

fn default_true() -> bool {
    true
}
