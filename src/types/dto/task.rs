use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::{CrmError, ValidationErrors};
use crate::types::db::task::{TaskPriority, TaskStatus};
use crate::types::internal::{EntityKind, EntityRef};

use super::common::{require_text, NAME_MAX};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    /// Defaults to Pending
    pub status: Option<TaskStatus>,
    /// Defaults to Medium
    pub priority: Option<TaskPriority>,
    /// Defaults to the caller on create
    pub assigned_to_id: Option<i64>,
    /// Contact, Deal or Lead
    pub related_to: EntityRef,
}

impl TaskInput {
    pub fn validate(&self) -> Result<(), CrmError> {
        let mut errors = ValidationErrors::new();
        require_text(&mut errors, "title", "Task title", &self.title, NAME_MAX);
        if !matches!(
            self.related_to.kind(),
            EntityKind::Contact | EntityKind::Deal | EntityKind::Lead
        ) {
            errors.add("related_to", "Tasks can only relate to a contact, deal or lead.");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Tasks due on this calendar day (UTC)
    pub due_date: Option<NaiveDate>,
    /// Not completed and due before now
    pub overdue: bool,
    pub assigned_to_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(related_to: EntityRef) -> TaskInput {
        TaskInput {
            title: "Follow up".to_string(),
            description: None,
            due_date: None,
            status: None,
            priority: None,
            assigned_to_id: None,
            related_to,
        }
    }

    #[test]
    fn test_related_to_is_limited() {
        assert!(input(EntityRef::Contact(1)).validate().is_ok());
        assert!(input(EntityRef::Deal(1)).validate().is_ok());
        assert!(input(EntityRef::Lead(1)).validate().is_ok());
        assert!(matches!(input(EntityRef::Company(1)).validate(), Err(CrmError::Validation(_))));
        assert!(matches!(input(EntityRef::Activity(1)).validate(), Err(CrmError::Validation(_))));
    }
}
