// Errors layer - Error type definitions
pub mod crm;
pub mod internal;

// Re-exports for convenience
pub use crm::{CrmError, FieldError, ValidationErrors};
pub use internal::InternalError;


#[cfg(test)]
mod internal_test;
