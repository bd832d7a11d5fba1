use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::internal::ActivityLogError;
use crate::errors::InternalError;
use crate::stores::ActivityStore;
use crate::types::db::activity::{self, ActivityType};
use crate::types::internal::context::RequestContext;
use crate::types::internal::{ActivityEntry, EntityRef};

/// Builder for activity entries
///
/// Provides a fluent API for the activity rows written by workflows.
///
/// # Example
/// ```ignore
/// logger
///     .builder(ActivityType::Note)
///     .with_context(ctx)
///     .on(EntityRef::Deal(deal.id))
///     .describe("Deal stage changed from 'Lead' to 'Won'")
///     .write(&txn)
///     .await?;
/// ```
pub struct ActivityBuilder {
    kind: ActivityType,
    user_id: Option<i64>,
    subject: Option<EntityRef>,
    description: Option<String>,
    store: Arc<ActivityStore>,
}

impl ActivityBuilder {
    pub fn new(store: Arc<ActivityStore>, kind: ActivityType) -> Self {
        Self {
            kind,
            user_id: None,
            subject: None,
            description: None,
            store,
        }
    }

    /// Takes the author from the request context
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.user_id = Some(ctx.user_id());
        self
    }

    /// Sets the author explicitly
    pub fn by(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn on(mut self, subject: EntityRef) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builds the entry without writing it
    ///
    /// # Errors
    /// Returns `ActivityLogError` when the author, subject or description is missing
    pub fn build(&self) -> Result<ActivityEntry, ActivityLogError> {
        let user_id = self.user_id.ok_or(ActivityLogError::MissingAuthor)?;
        let subject = self.subject.ok_or(ActivityLogError::MissingSubject)?;
        let description = self
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .ok_or(ActivityLogError::MissingDescription)?;

        Ok(ActivityEntry {
            kind: self.kind,
            user_id,
            subject,
            description,
            activity_date: None,
        })
    }

    /// Builds the entry and appends it on `conn`
    ///
    /// Pass the open transaction when the activity belongs to a larger write.
    pub async fn write(self, conn: &impl ConnectionTrait) -> Result<activity::Model, InternalError> {
        let entry = self.build()?;
        self.store.append(conn, entry).await
    }
}
