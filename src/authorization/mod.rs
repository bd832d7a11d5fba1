// Authorization layer - permission naming, per-resource policies and query scoping
pub mod permissions;
pub mod policy;
pub mod scope;

pub use permissions::{Ability, Resource};
pub use policy::{
    ActivityPolicy, CompanyPolicy, ContactPolicy, DealPolicy, LeadPolicy, Owned, Policy, TaskPolicy,
};
pub use scope::{scope_filter, text_search, ScopedEntity};
