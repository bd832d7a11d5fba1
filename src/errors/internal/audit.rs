use thiserror::Error;

/// Raised when an activity entry is written without a required part
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ActivityLogError {
    #[error("Failed to write activity: missing author")]
    MissingAuthor,

    #[error("Failed to write activity: missing subject")]
    MissingSubject,

    #[error("Failed to write activity: missing description")]
    MissingDescription,
}
