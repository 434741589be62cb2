//! Repository implementations over PostgreSQL.

pub mod permission;
pub mod user;

pub use permission::PermissionRepository;
pub use user::UserRepository;
