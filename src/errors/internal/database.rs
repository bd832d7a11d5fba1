use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: DbErr,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: DbErr,
    },
}

impl DatabaseError {
    pub fn source_err(&self) -> &DbErr {
        match self {
            DatabaseError::Operation { source, .. }
            | DatabaseError::TransactionBegin { source }
            | DatabaseError::TransactionCommit { source } => source,
        }
    }

    /// The driver rejected a write because of a unique index
    pub fn is_unique_violation(&self) -> bool {
        matches!(self.source_err().sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}
