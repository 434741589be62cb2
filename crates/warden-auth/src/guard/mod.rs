//! Per-request allow/deny decisions over verified claims.

pub mod context;
pub mod decision;
pub mod enforcer;
pub mod requirement;

pub use context::AuthContext;
pub use decision::{Decision, DenyReason};
pub use enforcer::AccessGuard;
pub use requirement::Requirement;
