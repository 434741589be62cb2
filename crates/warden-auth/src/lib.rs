//! # warden-auth
//!
//! Session and authorization engine for Warden.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing, verification and strength policy
//! - `jwt`: claims model, RSA key material, token issuance and verification
//! - `session`: login, refresh and change-password flows
//! - `guard`: per-request allow/deny decisions over verified claims
//! - `store`: the user lookup collaborator and an in-memory implementation

pub mod error;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod session;
pub mod store;

pub use error::{AuthError, AuthResult, PolicyError};
pub use guard::{AccessGuard, AuthContext, Decision, DenyReason, Requirement};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, KeyPair, TokenKind, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{AccessSnapshot, RefreshedToken, SessionManager, SuperuserSeed, seed_superuser};
pub use store::{MemoryUserStore, UserStore};
