use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::audit::ActivityBuilder;
use crate::errors::InternalError;
use crate::stores::ActivityStore;
use crate::types::db::activity::{self, ActivityType};
use crate::types::db::{deal, deal_stage};
use crate::types::internal::context::RequestContext;
use crate::types::internal::EntityRef;

/// Single write path for workflow-generated activity
pub struct ActivityLogger {
    pub activity_store: Arc<ActivityStore>,
}

impl ActivityLogger {
    pub fn new(activity_store: Arc<ActivityStore>) -> Self {
        Self { activity_store }
    }

    pub fn builder(&self, kind: ActivityType) -> ActivityBuilder {
        ActivityBuilder::new(self.activity_store.clone(), kind)
    }

    /// Records a deal moving between stages, including moves to the same stage
    pub async fn log_stage_change(
        &self,
        conn: &impl ConnectionTrait,
        ctx: &RequestContext,
        deal: &deal::Model,
        from: &deal_stage::Model,
        to: &deal_stage::Model,
    ) -> Result<activity::Model, InternalError> {
        self.builder(ActivityType::Note)
            .with_context(ctx)
            .on(EntityRef::Deal(deal.id))
            .describe(stage_change_description(&from.name, &to.name))
            .write(conn)
            .await
    }
}

pub fn stage_change_description(from: &str, to: &str) -> String {
    format!("Deal stage changed from '{}' to '{}'", from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_change_description() {
        assert_eq!(
            stage_change_description("Prospecting", "Won"),
            "Deal stage changed from 'Prospecting' to 'Won'"
        );
        assert_eq!(
            stage_change_description("Won", "Won"),
            "Deal stage changed from 'Won' to 'Won'"
        );
    }
}
