use std::sync::Arc;

use crate::audit::ActivityLogger;
use crate::config::DatabaseConnections;
use crate::providers::{ReferenceProvider, SeedProvider, UserProvider, WorkflowProvider};
use crate::stores::{
    ActivityStore, AuthorizationStore, CompanyStore, ContactStore, DealStageStore, DealStore,
    LeadStore, SubjectStore, TaskStore, UserStore,
};
use crate::types::dto::PageLimits;

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once and shared across coordinators.
///
/// # Architecture
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(connections, page_limits)
///   ↓ creates once
///   ├─ connections (DatabaseConnections)
///   ├─ one Arc per store
///   ├─ activity_logger (ActivityLogger over the activity store)
///   └─ providers composed from the stores
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   ├─ LeadCoordinator::new(app_data) → extracts stores and providers
///   └─ ...
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub page_limits: PageLimits,
    pub activity_logger: Arc<ActivityLogger>,
    pub user_store: Arc<UserStore>,
    pub authorization_store: Arc<AuthorizationStore>,
    pub lead_store: Arc<LeadStore>,
    pub contact_store: Arc<ContactStore>,
    pub company_store: Arc<CompanyStore>,
    pub deal_store: Arc<DealStore>,
    pub deal_stage_store: Arc<DealStageStore>,
    pub task_store: Arc<TaskStore>,
    pub activity_store: Arc<ActivityStore>,
    pub subject_store: Arc<SubjectStore>,
    pub providers: Providers,
}

/// Providers shared by every coordinator
pub struct Providers {
    pub user_provider: Arc<UserProvider>,
    pub reference_provider: Arc<ReferenceProvider>,
    pub workflow_provider: Arc<WorkflowProvider>,
    pub seed_provider: Arc<SeedProvider>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// Database connections should be initialized and migrated before calling this.
    pub fn init(connections: DatabaseConnections, page_limits: PageLimits) -> Self {
        tracing::debug!("Creating stores...");
        let activity_store = Arc::new(ActivityStore::new());
        let activity_logger = Arc::new(ActivityLogger::new(activity_store.clone()));

        let user_store = Arc::new(UserStore::new());
        let authorization_store = Arc::new(AuthorizationStore::new());
        let lead_store = Arc::new(LeadStore::new());
        let contact_store = Arc::new(ContactStore::new());
        let company_store = Arc::new(CompanyStore::new());
        let deal_store = Arc::new(DealStore::new());
        let deal_stage_store = Arc::new(DealStageStore::new());
        let task_store = Arc::new(TaskStore::new());
        let subject_store = Arc::new(SubjectStore::new());
        tracing::debug!("Stores created");

        let providers = Providers {
            user_provider: Arc::new(UserProvider::new(user_store.clone(), authorization_store.clone())),
            reference_provider: Arc::new(ReferenceProvider::new(
                user_store.clone(),
                company_store.clone(),
                contact_store.clone(),
                deal_stage_store.clone(),
                subject_store.clone(),
            )),
            workflow_provider: Arc::new(WorkflowProvider::new(
                lead_store.clone(),
                contact_store.clone(),
                deal_store.clone(),
                task_store.clone(),
                activity_logger.clone(),
            )),
            seed_provider: Arc::new(SeedProvider::new(authorization_store.clone(), deal_stage_store.clone())),
        };

        let app_data = Self {
            connections,
            page_limits,
            activity_logger,
            user_store,
            authorization_store,
            lead_store,
            contact_store,
            company_store,
            deal_store,
            deal_stage_store,
            task_store,
            activity_store,
            subject_store,
            providers,
        };

        tracing::info!("AppData initialization complete");
        app_data
    }
}
