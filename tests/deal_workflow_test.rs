mod common;

use std::str::FromStr;

use crm_backend::coordinators::{DealCoordinator, ResourceCoordinator};
use crm_backend::errors::CrmError;
use crm_backend::types::db::activity::{self, ActivityType};
use crm_backend::types::internal::EntityKind;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use common::*;

const REP: &[&str] = &["view-deals", "create-deals", "edit-deals", "delete-deals"];

async fn deal_activities(app: &crm_backend::AppData, deal_id: i64) -> Vec<activity::Model> {
    activity::Entity::find()
        .filter(activity::Column::SubjectType.eq(EntityKind::Deal))
        .filter(activity::Column::SubjectId.eq(deal_id))
        .order_by_asc(activity::Column::Id)
        .all(&app.connections.crm)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_stage_change_moves_deal_and_logs_note() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let prospecting = custom_stage(&app, "Prospecting", 0).await;
    let won = stage(&app, "Won").await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let deal = insert_deal(&app, &rep, contact.id, &prospecting, "2500.00").await;
    let deals = DealCoordinator::new(app.clone());

    let updated = deals.update_deal_stage(&rep, deal.id, won.id).await.unwrap();

    assert_eq!(updated.deal.deal_stage_id, won.id);
    let activities = deal_activities(&app, deal.id).await;
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].description, "Deal stage changed from 'Prospecting' to 'Won'");
    assert_eq!(activities[0].kind, ActivityType::Note);
    assert_eq!(activities[0].user_id, rep.user_id());
}

#[tokio::test]
async fn test_every_stage_change_appends_one_activity() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let lead_stage = stage(&app, "Lead").await;
    let proposal = stage(&app, "Proposal").await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let deal = insert_deal(&app, &rep, contact.id, &lead_stage, "100").await;
    let deals = DealCoordinator::new(app.clone());

    deals.update_deal_stage(&rep, deal.id, proposal.id).await.unwrap();
    deals.update_deal_stage(&rep, deal.id, proposal.id).await.unwrap();

    let activities = deal_activities(&app, deal.id).await;
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[1].description, "Deal stage changed from 'Proposal' to 'Proposal'");
}

#[tokio::test]
async fn test_stage_change_errors() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let stranger = user_with(&app, "Stranger", REP).await;
    let lead_stage = stage(&app, "Lead").await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let deal = insert_deal(&app, &rep, contact.id, &lead_stage, "100").await;
    let deals = DealCoordinator::new(app.clone());

    let missing_stage = deals.update_deal_stage(&rep, deal.id, 999).await;
    assert!(matches!(missing_stage, Err(CrmError::NotFound { resource: "DealStage", .. })));

    let missing_deal = deals.update_deal_stage(&rep, 999, lead_stage.id).await;
    assert!(matches!(missing_deal, Err(CrmError::NotFound { resource: "Deal", .. })));

    let not_owner = deals.update_deal_stage(&stranger, deal.id, lead_stage.id).await;
    assert!(matches!(not_owner, Err(CrmError::Forbidden { .. })));

    assert!(deal_activities(&app, deal.id).await.is_empty());
}

#[tokio::test]
async fn test_create_computes_expected_revenue() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let qualified = stage(&app, "Qualified").await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let deals = DealCoordinator::new(app.clone());

    let mut input = deal_input("Fleet renewal", contact.id, qualified.id, "1234.50");
    input.probability = Some(40);
    let created = deals.create(&rep, &input).await.unwrap();

    assert_eq!(created.deal.amount_cents, 123_450);
    assert_eq!(created.amount, Decimal::from_str("1234.50").unwrap());
    assert_eq!(created.expected_revenue, Decimal::from_str("493.80").unwrap());
    assert_eq!(created.deal.assigned_to_id, rep.user_id());
}

#[tokio::test]
async fn test_create_reports_invalid_references() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let deals = DealCoordinator::new(app.clone());

    let result = deals.create(&rep, &deal_input("Ghost", 404, 505, "10")).await;

    match result {
        Err(CrmError::Validation(fields)) => {
            let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names, vec!["contact_id", "deal_stage_id"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stages_follow_pipeline_order() {
    let app = setup_app().await;
    let deals = DealCoordinator::new(app.clone());

    let names: Vec<_> = deals.stages().await.unwrap().into_iter().map(|s| s.name).collect();

    assert_eq!(
        names,
        vec!["Lead", "Contacted", "Qualified", "Proposal", "Negotiation", "Won", "Lost"]
    );
}

#[tokio::test]
async fn test_trashed_deal_needs_delete_all_to_restore() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let admin = user_with(&app, "Admin", &["view-all-deals", "delete-all-deals"]).await;
    let lead_stage = stage(&app, "Lead").await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let deal = insert_deal(&app, &rep, contact.id, &lead_stage, "100").await;
    let deals = DealCoordinator::new(app.clone());

    deals.delete(&rep, deal.id).await.unwrap();
    assert!(matches!(deals.get(&rep, deal.id).await, Err(CrmError::NotFound { .. })));
    assert!(matches!(deals.restore(&rep, deal.id).await, Err(CrmError::Forbidden { .. })));

    let restored = deals.restore(&admin, deal.id).await.unwrap();
    assert!(restored.deal.deleted_at.is_none());
}

#[tokio::test]
async fn test_failed_activity_write_keeps_old_stage() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let lead_stage = stage(&app, "Lead").await;
    let won = stage(&app, "Won").await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let deal = insert_deal(&app, &rep, contact.id, &lead_stage, "750.00").await;
    reject_writes(&app, "activities", "INSERT").await;
    let deals = DealCoordinator::new(app.clone());

    let result = deals.update_deal_stage(&rep, deal.id, won.id).await;

    assert!(matches!(result, Err(CrmError::Storage(_))));
    let reloaded = deals.get(&rep, deal.id).await.unwrap();
    assert_eq!(reloaded.deal.deal_stage_id, lead_stage.id);
    assert!(deal_activities(&app, deal.id).await.is_empty());
}
