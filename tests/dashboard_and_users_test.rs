mod common;

use std::str::FromStr;

use chrono::Utc;
use crm_backend::config::DatabaseConnections;
use crm_backend::coordinators::{DashboardCoordinator, DealCoordinator, LeadCoordinator};
use crm_backend::errors::CrmError;
use crm_backend::providers::seed_provider::{MANAGER, SALES_REP};
use crm_backend::types::dto::lead::ConvertLeadOverrides;
use crm_backend::types::dto::user::NewUser;
use crm_backend::types::internal::EntityRef;
use rust_decimal::Decimal;

use common::*;

#[tokio::test]
async fn test_dashboard_counts_are_scoped() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep", &["view-leads", "convert-leads", "edit-deals"]).await;
    let other = user_with(&app, "Other", &[]).await;

    let converted = insert_lead(&app, &rep, "converted@example.com").await;
    insert_lead(&app, &rep, "fresh@example.com").await;
    insert_lead(&app, &other, "theirs@example.com").await;
    LeadCoordinator::new(app.clone())
        .convert_lead(&rep, converted.id, ConvertLeadOverrides::default())
        .await
        .unwrap();

    insert_company(&app, &rep, "Acme").await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let lead_stage = stage(&app, "Lead").await;
    let won = stage(&app, "Won").await;
    insert_deal(&app, &rep, contact.id, &lead_stage, "1000.00").await;
    let closed = insert_deal(&app, &rep, contact.id, &lead_stage, "500.25").await;
    DealCoordinator::new(app.clone())
        .update_deal_stage(&rep, closed.id, won.id)
        .await
        .unwrap();

    let late = task_input("Late", EntityRef::Contact(contact.id), Some(Utc::now() - chrono::Duration::hours(2)));
    app.task_store
        .create(&app.connections.crm, &late, rep.user_id())
        .await
        .unwrap();
    insert_task(&app, &other, EntityRef::Contact(contact.id)).await;

    let stats = DashboardCoordinator::new(app.clone()).stats(&rep).await.unwrap();

    assert_eq!(stats.leads.total, 2);
    assert_eq!(stats.leads.new, 1);
    assert_eq!(stats.leads.converted, 1);
    // Jane plus the contact created by the conversion
    assert_eq!(stats.contacts, 2);
    assert_eq!(stats.companies, 1);
    assert_eq!(stats.deals.total, 2);
    assert_eq!(stats.deals.active, 1);
    assert_eq!(stats.deals.total_value, Decimal::from_str("1500.25").unwrap());
    assert_eq!(stats.tasks.total, 1);
    assert_eq!(stats.tasks.pending, 1);
    assert_eq!(stats.tasks.overdue, 1);
}

#[tokio::test]
async fn test_inactive_user_cannot_act() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep", &["view-leads"]).await;

    app.providers
        .user_provider
        .deactivate(&app.connections.crm, rep.user_id())
        .await
        .unwrap();
    let result = app
        .providers
        .user_provider
        .authenticate(&app.connections.crm, rep.user_id())
        .await;

    assert!(matches!(result, Err(CrmError::Forbidden { .. })));
    assert!(matches!(
        app.providers.user_provider.authenticate(&app.connections.crm, 999).await,
        Err(CrmError::NotFound { resource: "User", .. })
    ));
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let app = setup_app().await;
    let db = &app.connections.crm;

    let again = app.providers.seed_provider.seed(db).await.unwrap();
    let stages = app.deal_stage_store.list(db).await.unwrap();

    assert_eq!(again.stages, 7);
    assert_eq!(stages.len(), 7);
    assert_eq!(stages[0].color, "#6B7280");
    assert_eq!(stages[6].name, "Lost");
}

#[tokio::test]
async fn test_created_user_receives_role_permissions() {
    let app = setup_app().await;
    let provider = &app.providers.user_provider;
    let input = NewUser {
        name: "Sam Seller".to_string(),
        email: "sam@example.com".to_string(),
        roles: vec![SALES_REP.to_string()],
    };

    let txn = app.connections.begin_transaction().await.unwrap();
    let user = provider.create_user(&txn, &input).await.unwrap();
    DatabaseConnections::commit_transaction(txn).await.unwrap();

    let actor = provider.authenticate(&app.connections.crm, user.id).await.unwrap();
    assert!(actor.has_permission("view-all-leads"));
    assert!(actor.has_permission("convert-leads"));
    assert!(!actor.has_permission("delete-leads"));

    assert!(provider.assign_role(&app.connections.crm, user.id, MANAGER).await.unwrap());
    assert!(!provider.assign_role(&app.connections.crm, user.id, MANAGER).await.unwrap());

    let users = provider.list_users(&app.connections.crm).await.unwrap();
    let summary = users.iter().find(|s| s.user.id == user.id).unwrap();
    assert_eq!(summary.roles.len(), 2);
}

#[tokio::test]
async fn test_unknown_role_leaves_no_user_behind() {
    let app = setup_app().await;
    let provider = &app.providers.user_provider;
    let input = NewUser {
        name: "Nora".to_string(),
        email: "nora@example.com".to_string(),
        roles: vec!["Wizard".to_string()],
    };

    let txn = app.connections.begin_transaction().await.unwrap();
    let result = provider.create_user(&txn, &input).await;
    drop(txn);

    assert!(matches!(result, Err(CrmError::Validation(_))));
    assert!(app
        .user_store
        .find_by_email(&app.connections.crm, "nora@example.com")
        .await
        .unwrap()
        .is_none());
}
