//! Permission domain entities and built-in permission codes.

pub mod code;
pub mod model;

pub use code::PermissionCode;
pub use model::Permission;
