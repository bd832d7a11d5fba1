use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::{InternalError, ValidationErrors};
use crate::stores::{CompanyStore, ContactStore, DealStageStore, SubjectStore, UserStore};
use crate::types::internal::EntityRef;

/// Checks that ids supplied in input point at existing rows
///
/// Each check records a field error instead of failing, so one call can report every
/// dangling reference together with the payload's own validation errors.
pub struct ReferenceProvider {
    user_store: Arc<UserStore>,
    company_store: Arc<CompanyStore>,
    contact_store: Arc<ContactStore>,
    deal_stage_store: Arc<DealStageStore>,
    subject_store: Arc<SubjectStore>,
}

impl ReferenceProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        company_store: Arc<CompanyStore>,
        contact_store: Arc<ContactStore>,
        deal_stage_store: Arc<DealStageStore>,
        subject_store: Arc<SubjectStore>,
    ) -> Self {
        Self {
            user_store,
            company_store,
            contact_store,
            deal_stage_store,
            subject_store,
        }
    }

    pub async fn check_user(
        &self,
        conn: &impl ConnectionTrait,
        errors: &mut ValidationErrors,
        field: &str,
        user_id: i64,
    ) -> Result<(), InternalError> {
        if !self.user_store.exists(conn, user_id).await? {
            errors.add(field, invalid_selection(field));
        }
        Ok(())
    }

    pub async fn check_company(
        &self,
        conn: &impl ConnectionTrait,
        errors: &mut ValidationErrors,
        field: &str,
        company_id: Option<i64>,
    ) -> Result<(), InternalError> {
        if let Some(company_id) = company_id {
            if !self.company_store.exists(conn, company_id).await? {
                errors.add(field, invalid_selection(field));
            }
        }
        Ok(())
    }

    pub async fn check_contact(
        &self,
        conn: &impl ConnectionTrait,
        errors: &mut ValidationErrors,
        field: &str,
        contact_id: i64,
    ) -> Result<(), InternalError> {
        if self.contact_store.find_by_id(conn, contact_id).await?.is_none() {
            errors.add(field, invalid_selection(field));
        }
        Ok(())
    }

    pub async fn check_stage(
        &self,
        conn: &impl ConnectionTrait,
        errors: &mut ValidationErrors,
        field: &str,
        stage_id: i64,
    ) -> Result<(), InternalError> {
        if self.deal_stage_store.find_by_id(conn, stage_id).await?.is_none() {
            errors.add(field, invalid_selection(field));
        }
        Ok(())
    }

    pub async fn check_subject(
        &self,
        conn: &impl ConnectionTrait,
        errors: &mut ValidationErrors,
        field: &str,
        subject: EntityRef,
    ) -> Result<(), InternalError> {
        if !self.subject_store.exists(conn, subject).await? {
            errors.add(field, invalid_selection(field));
        }
        Ok(())
    }

    /// Existence of a polymorphic subject, for callers that report NotFound instead
    pub async fn subject_exists(
        &self,
        conn: &impl ConnectionTrait,
        subject: EntityRef,
    ) -> Result<bool, InternalError> {
        self.subject_store.exists(conn, subject).await
    }
}

fn invalid_selection(field: &str) -> String {
    format!("The selected {} is invalid.", field.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selection_message() {
        assert_eq!(invalid_selection("company_id"), "The selected company id is invalid.");
        assert_eq!(invalid_selection("related_to"), "The selected related to is invalid.");
    }
}
