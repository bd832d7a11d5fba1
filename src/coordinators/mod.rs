// Coordinators layer - Workflow orchestration
//
// Coordinators are the service-level entry points. Each one checks policies,
// validates input, then composes store and provider operations. Every
// operation takes the RequestContext of the acting user.

pub mod activity_coordinator;
pub mod company_coordinator;
pub mod contact_coordinator;
pub mod dashboard_coordinator;
pub mod deal_coordinator;
pub mod lead_coordinator;
pub mod search_coordinator;
pub mod task_coordinator;

pub use activity_coordinator::ActivityCoordinator;
pub use company_coordinator::CompanyCoordinator;
pub use contact_coordinator::ContactCoordinator;
pub use dashboard_coordinator::DashboardCoordinator;
pub use deal_coordinator::DealCoordinator;
pub use lead_coordinator::LeadCoordinator;
pub use search_coordinator::SearchCoordinator;
pub use task_coordinator::TaskCoordinator;

use async_trait::async_trait;

use crate::errors::{CrmError, InternalError};
use crate::types::dto::{Page, PageRequest};
use crate::types::internal::context::RequestContext;

/// CRUD surface shared by every record type
#[async_trait]
pub trait ResourceCoordinator {
    type Record: Send;
    type Filter: Send + Sync;
    type Input: Send + Sync;

    /// Scoped, filtered, paginated listing
    async fn list(
        &self,
        ctx: &RequestContext,
        filter: &Self::Filter,
        page: PageRequest,
    ) -> Result<Page<Self::Record>, CrmError>;

    async fn get(&self, ctx: &RequestContext, id: i64) -> Result<Self::Record, CrmError>;

    async fn create(&self, ctx: &RequestContext, input: &Self::Input) -> Result<Self::Record, CrmError>;

    /// Full replacement of the editable fields
    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        input: &Self::Input,
    ) -> Result<Self::Record, CrmError>;

    async fn delete(&self, ctx: &RequestContext, id: i64) -> Result<(), CrmError>;
}

/// Maps a unique violation on `field` to Conflict, anything else to Storage
pub(crate) fn unique_conflict(error: InternalError, field: &str, value: &str) -> CrmError {
    if error.is_unique_violation() {
        CrmError::conflict(field, value)
    } else {
        CrmError::Storage(error)
    }
}
