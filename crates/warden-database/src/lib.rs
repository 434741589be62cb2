//! # warden-database
//!
//! PostgreSQL connection management, schema migrations, built-in
//! permission provisioning and the [`UserStore`](warden_auth::UserStore)
//! implementation backing the session manager.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{PermissionRepository, UserRepository};
