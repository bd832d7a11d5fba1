// Common test utilities for integration tests

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use crm_backend::config::DatabaseConnections;
use crm_backend::types::db::lead::LeadSource;
use crm_backend::types::db::{company, contact, deal, deal_stage, lead, task};
use crm_backend::types::dto::company::CompanyInput;
use crm_backend::types::dto::contact::ContactInput;
use crm_backend::types::dto::deal::{DealFigures, DealInput};
use crm_backend::types::dto::lead::LeadInput;
use crm_backend::types::dto::task::TaskInput;
use crm_backend::types::dto::PageLimits;
use crm_backend::types::internal::context::RequestContext;
use crm_backend::types::internal::EntityRef;
use crm_backend::AppData;
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;

/// Creates an in-memory CRM with migrations and seed data applied
pub async fn setup_app() -> Arc<AppData> {
    let connections = DatabaseConnections::connect_url("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    connections.migrate().await.expect("Failed to run migrations");

    let app_data = AppData::init(connections, PageLimits::default());
    app_data
        .providers
        .seed_provider
        .seed(&app_data.connections.crm)
        .await
        .expect("Failed to seed reference data");

    Arc::new(app_data)
}

/// Creates a user holding exactly `permissions` through a dedicated role
pub async fn user_with(app: &AppData, name: &str, permissions: &[&str]) -> RequestContext {
    let db = &app.connections.crm;
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));

    let user = app.user_store.create(db, name, &email).await.expect("create user");
    let role = app
        .authorization_store
        .ensure_role(db, &format!("role for {}", email))
        .await
        .expect("create role");
    for name in permissions {
        let permission = app
            .authorization_store
            .ensure_permission(db, name)
            .await
            .expect("create permission");
        app.authorization_store
            .grant(db, role.id, permission.id)
            .await
            .expect("grant permission");
    }
    app.authorization_store
        .assign_role(db, user.id, role.id)
        .await
        .expect("assign role");

    actor(app, user.id).await
}

/// Re-resolves a user's permissions into a fresh context
pub async fn actor(app: &AppData, user_id: i64) -> RequestContext {
    let user = app
        .providers
        .user_provider
        .authenticate(&app.connections.crm, user_id)
        .await
        .expect("authenticate user");
    RequestContext::new(user)
}

pub fn lead_input(first_name: &str, email: &str) -> LeadInput {
    LeadInput {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        phone_number: Some("555-0100".to_string()),
        source: LeadSource::Website,
        status: None,
        assigned_to_id: None,
        notes: Some("Met at the expo".to_string()),
    }
}

pub fn contact_input(first_name: &str, email: &str) -> ContactInput {
    ContactInput {
        first_name: first_name.to_string(),
        last_name: "Contact".to_string(),
        email: email.to_string(),
        phone_number: None,
        company_id: None,
        owner_id: None,
        notes: None,
    }
}

pub fn company_input(name: &str) -> CompanyInput {
    CompanyInput {
        name: name.to_string(),
        industry: Some("Manufacturing".to_string()),
        website: None,
        phone_number: None,
        address: None,
        owner_id: None,
        notes: None,
    }
}

pub fn deal_input(name: &str, contact_id: i64, deal_stage_id: i64, amount: &str) -> DealInput {
    DealInput {
        name: name.to_string(),
        contact_id,
        deal_stage_id,
        amount: Decimal::from_str(amount).expect("decimal amount"),
        closing_date: None,
        probability: None,
        assigned_to_id: None,
        description: None,
    }
}

pub fn task_input(title: &str, related_to: EntityRef, due_date: Option<DateTime<Utc>>) -> TaskInput {
    TaskInput {
        title: title.to_string(),
        description: None,
        due_date,
        status: None,
        priority: None,
        assigned_to_id: None,
        related_to,
    }
}

/// Inserts a lead assigned to `owner` directly through the store
pub async fn insert_lead(app: &AppData, owner: &RequestContext, email: &str) -> lead::Model {
    app.lead_store
        .create(&app.connections.crm, &lead_input("Lead", email), Some(owner.user_id()))
        .await
        .expect("insert lead")
}

/// Inserts a contact owned by `owner` directly through the store
pub async fn insert_contact(app: &AppData, owner: &RequestContext, first_name: &str, email: &str) -> contact::Model {
    app.contact_store
        .create(&app.connections.crm, &contact_input(first_name, email), owner.user_id())
        .await
        .expect("insert contact")
}

pub async fn insert_company(app: &AppData, owner: &RequestContext, name: &str) -> company::Model {
    app.company_store
        .create(&app.connections.crm, &company_input(name), owner.user_id())
        .await
        .expect("insert company")
}

pub async fn insert_deal(
    app: &AppData,
    owner: &RequestContext,
    contact_id: i64,
    stage: &deal_stage::Model,
    amount: &str,
) -> deal::Model {
    let input = deal_input("Widget order", contact_id, stage.id, amount);
    let figures: DealFigures = input.validate().expect("valid deal");
    app.deal_store
        .create(&app.connections.crm, &input, figures, owner.user_id())
        .await
        .expect("insert deal")
}

pub async fn insert_task(app: &AppData, owner: &RequestContext, related_to: EntityRef) -> task::Model {
    app.task_store
        .create(&app.connections.crm, &task_input("Follow up", related_to, None), owner.user_id())
        .await
        .expect("insert task")
}

/// Looks up a seeded pipeline stage by name
pub async fn stage(app: &AppData, name: &str) -> deal_stage::Model {
    app.deal_stage_store
        .find_by_name(&app.connections.crm, name)
        .await
        .expect("query stage")
        .expect("stage exists")
}

/// Adds a stage outside the default pipeline
pub async fn custom_stage(app: &AppData, name: &str, position: i32) -> deal_stage::Model {
    app.deal_stage_store
        .ensure(&app.connections.crm, name, position, "#64748B")
        .await
        .expect("create stage")
}

/// Installs a trigger that aborts every `event` (INSERT, UPDATE, DELETE) on `table`
pub async fn reject_writes(app: &AppData, table: &str, event: &str) {
    let sql = format!(
        "CREATE TRIGGER reject_{table}_{event} BEFORE {event} ON {table} BEGIN SELECT RAISE(ABORT, 'write rejected'); END",
        table = table,
        event = event.to_lowercase(),
    );
    app.connections.crm.execute_unprepared(&sql).await.unwrap();
}
