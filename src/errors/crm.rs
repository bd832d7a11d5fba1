use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::internal::InternalError;

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Caller-facing error taxonomy returned by every coordinator operation
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Not allowed to {action} {resource}")]
    Forbidden {
        action: &'static str,
        resource: &'static str,
    },

    #[error("Lead {lead_id} has already been converted")]
    AlreadyConverted { lead_id: i64 },

    #[error("Conflict: {field} '{value}' is already in use")]
    Conflict { field: String, value: String },

    #[error(transparent)]
    Storage(#[from] InternalError),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl CrmError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        CrmError::NotFound { resource, id }
    }

    pub fn forbidden(action: &'static str, resource: &'static str) -> Self {
        tracing::warn!(action, resource, "Authorization denied");
        CrmError::Forbidden { action, resource }
    }

    pub fn conflict(field: impl Into<String>, value: impl Into<String>) -> Self {
        CrmError::Conflict {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CrmError::Validation(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    /// Stable snake_case code for callers
    pub fn kind(&self) -> &'static str {
        match self {
            CrmError::Validation(_) => "validation",
            CrmError::NotFound { .. } => "not_found",
            CrmError::Forbidden { .. } => "forbidden",
            CrmError::AlreadyConverted { .. } => "already_converted",
            CrmError::Conflict { .. } => "conflict",
            CrmError::Storage(_) => "storage",
        }
    }
}

/// Accumulates field errors so one call reports every problem at once
#[derive(Debug, Default)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), CrmError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(CrmError::Validation(self.0))
        }
    }
}
