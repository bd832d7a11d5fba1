use serde::Serialize;

use crate::types::internal::EntityKind;

pub const MIN_QUERY_CHARS: usize = 2;
pub const RESULTS_PER_TYPE: u64 = 5;

/// One row of the global search dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub label: String,
    pub subtitle: String,
}
