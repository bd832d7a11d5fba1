use chrono::{DateTime, Utc};

use crate::types::db::activity::ActivityType;
use crate::types::internal::EntityRef;

/// Activity row waiting to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub kind: ActivityType,
    pub user_id: i64,
    pub subject: EntityRef,
    pub description: String,
    /// Defaults to the insert time
    pub activity_date: Option<DateTime<Utc>>,
}
