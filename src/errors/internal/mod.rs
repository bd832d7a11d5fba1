use thiserror::Error;

pub mod audit;
pub mod database;

pub use audit::ActivityLogError;
pub use database::DatabaseError;

/// Internal error type for store and provider operations
///
/// Not exposed to callers directly: coordinators wrap it in `CrmError::Storage` or
/// translate recognisable constraint failures into `CrmError::Conflict`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    ActivityLog(#[from] ActivityLogError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation { operation: operation.to_string(), source })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, InternalError::Database(e) if e.is_unique_violation())
    }
}
