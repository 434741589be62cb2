//! Login, refresh and change-password flows.

pub mod manager;
pub mod seed;
pub mod snapshot;

pub use manager::{RefreshedToken, SessionManager};
pub use seed::{SuperuserSeed, seed_superuser};
pub use snapshot::AccessSnapshot;
