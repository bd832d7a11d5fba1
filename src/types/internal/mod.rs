// Internal types - never persisted directly
pub mod audit;
pub mod auth;
pub mod context;
pub mod entity_ref;

pub use audit::ActivityEntry;
pub use auth::{AuthenticatedUser, PermissionSet};
pub use entity_ref::{EntityKind, EntityRef};
