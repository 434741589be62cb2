//! # warden-entity
//!
//! Relational snapshot types for Warden. Every struct here mirrors a
//! database row as the storage collaborator hands it over, including the
//! eagerly loaded relations (user → roles → permissions, user → tenants).
//! Nothing in this crate filters by active flags; that happens in
//! `warden-auth` at token issuance.

pub mod permission;
pub mod role;
pub mod tenant;
pub mod user;

pub use permission::{Permission, PermissionCode};
pub use role::Role;
pub use tenant::Tenant;
pub use user::{NewUser, User};
