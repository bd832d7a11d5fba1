// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate. They take the connection or open transaction
// to work on and never evaluate record policies.

pub mod reference_provider;
pub mod seed_provider;
pub mod user_provider;
pub mod workflow_provider;

pub use reference_provider::ReferenceProvider;
pub use seed_provider::{SeedProvider, SeedSummary};
pub use user_provider::UserProvider;
pub use workflow_provider::WorkflowProvider;
