#[cfg(test)]
mod tests {
    use crate::errors::internal::{DatabaseError, InternalError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("insert_lead", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("insert_lead"));
        assert!(error_string.contains("Database error"));
    }

    #[test]
    fn test_transaction_errors_wrap_database_error() {
        let error = InternalError::transaction_begin(DbErr::Custom("busy".to_string()));
        assert!(matches!(error, InternalError::Database(DatabaseError::TransactionBegin { .. })));
        assert!(error.to_string().contains("Starting transaction failed"));

        let error = InternalError::transaction_commit(DbErr::Custom("busy".to_string()));
        assert!(error.to_string().contains("Committing transaction failed"));
    }

    #[test]
    fn test_plain_database_error_is_not_a_constraint_violation() {
        let error = InternalError::database("find_lead", DbErr::RecordNotFound("lead".to_string()));

        assert!(!error.is_unique_violation());
    }
}
