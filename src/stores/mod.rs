// Stores layer - Data access and repository pattern
pub mod activity_store;
pub mod authorization_store;
pub mod company_store;
pub mod contact_store;
pub mod deal_stage_store;
pub mod deal_store;
pub mod lead_store;
pub mod subject_store;
pub mod task_store;
pub mod user_store;

pub use activity_store::ActivityStore;
pub use authorization_store::AuthorizationStore;
pub use company_store::CompanyStore;
pub use contact_store::ContactStore;
pub use deal_stage_store::DealStageStore;
pub use deal_store::DealStore;
pub use lead_store::LeadStore;
pub use subject_store::SubjectStore;
pub use task_store::TaskStore;
pub use user_store::UserStore;

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Select};

use crate::errors::InternalError;
use crate::types::dto::Page;

/// Counts and fetches one 1-based page of `query`.
///
/// The query must already carry scoping, filters and ordering.
pub(crate) async fn fetch_page<C, E>(
    conn: &C,
    query: Select<E>,
    page: u64,
    per_page: u64,
    operation: &str,
) -> Result<Page<E::Model>, InternalError>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync,
{
    let page = page.max(1);
    let per_page = per_page.max(1);
    let paginator = query.paginate(conn, per_page);

    let total = paginator
        .num_items()
        .await
        .map_err(|e| InternalError::database(operation, e))?;
    let items = paginator
        .fetch_page(page - 1)
        .await
        .map_err(|e| InternalError::database(operation, e))?;

    tracing::debug!(operation, page, per_page, total, "Fetched page");
    Ok(Page::new(items, total, page, per_page))
}
