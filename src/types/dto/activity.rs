use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::{CrmError, ValidationErrors};
use crate::types::db::activity::ActivityType;
use crate::types::internal::EntityRef;

pub const DEFAULT_RECENT_LIMIT: u64 = 10;
pub const MAX_RECENT_LIMIT: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivityInput {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub subject: EntityRef,
    /// Defaults to now
    pub activity_date: Option<DateTime<Utc>>,
}

impl ActivityInput {
    pub fn validate(&self) -> Result<(), CrmError> {
        let mut errors = ValidationErrors::new();
        if self.description.trim().is_empty() {
            errors.add("description", "Activity description is required.");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActivityFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ActivityType>,
    pub user_id: Option<i64>,
    pub subject: Option<EntityRef>,
    pub activity_date_from: Option<DateTime<Utc>>,
    pub activity_date_to: Option<DateTime<Utc>>,
}
