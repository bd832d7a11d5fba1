mod common;

use crm_backend::coordinators::{CompanyCoordinator, ContactCoordinator, LeadCoordinator, ResourceCoordinator};
use crm_backend::errors::CrmError;
use crm_backend::types::db::{contact, deal};
use crm_backend::types::dto::lead::ConvertLeadOverrides;
use sea_orm::EntityTrait;

use common::*;

const REP: &[&str] = &[
    "view-contacts",
    "edit-contacts",
    "delete-contacts",
    "view-companies",
    "delete-companies",
    "view-leads",
    "convert-leads",
];

#[tokio::test]
async fn test_update_contact_keeps_owner_and_checks_email() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let jane = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    insert_contact(&app, &rep, "John", "john@example.com").await;
    let contacts = ContactCoordinator::new(app.clone());

    let mut input = contact_input("Janet", "jane@example.com");
    input.phone_number = Some("555-0199".to_string());
    let updated = contacts.update(&rep, jane.id, &input).await.unwrap();
    assert_eq!(updated.first_name, "Janet");
    assert_eq!(updated.owner_id, rep.user_id());

    let taken = contact_input("Janet", "john@example.com");
    assert!(matches!(
        contacts.update(&rep, jane.id, &taken).await,
        Err(CrmError::Conflict { ref field, .. }) if field == "email"
    ));
}

#[tokio::test]
async fn test_update_and_delete_need_ownership() {
    let app = setup_app().await;
    let owner = user_with(&app, "Owner", REP).await;
    let other = user_with(&app, "Other", REP).await;
    let contact = insert_contact(&app, &owner, "Jane", "jane@example.com").await;
    let contacts = ContactCoordinator::new(app.clone());

    let input = contact_input("Jane", "jane@example.com");
    assert!(matches!(
        contacts.update(&other, contact.id, &input).await,
        Err(CrmError::Forbidden { action: "update", .. })
    ));
    assert!(matches!(
        contacts.delete(&other, contact.id).await,
        Err(CrmError::Forbidden { action: "delete", .. })
    ));
    assert!(matches!(
        contacts.delete(&owner, 9_999).await,
        Err(CrmError::NotFound { resource: "Contact", .. })
    ));
}

#[tokio::test]
async fn test_deleting_contact_removes_its_deals() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let lead_stage = stage(&app, "Lead").await;
    let deal = insert_deal(&app, &rep, contact.id, &lead_stage, "300.00").await;
    let contacts = ContactCoordinator::new(app.clone());

    contacts.delete(&rep, contact.id).await.unwrap();

    let db = &app.connections.crm;
    assert!(contact::Entity::find_by_id(contact.id).one(db).await.unwrap().is_none());
    assert!(deal::Entity::find_by_id(deal.id).one(db).await.unwrap().is_none());
}

#[tokio::test]
async fn test_converted_contact_cannot_be_deleted() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let lead = insert_lead(&app, &rep, "ada@example.com").await;
    let conversion = LeadCoordinator::new(app.clone())
        .convert_lead(&rep, lead.id, ConvertLeadOverrides::default())
        .await
        .unwrap();
    let contacts = ContactCoordinator::new(app.clone());

    let result = contacts.delete(&rep, conversion.contact.id).await;

    match result {
        Err(CrmError::Conflict { field, value }) => {
            assert_eq!(field, "contact");
            assert_eq!(value, conversion.contact.id.to_string());
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(contacts.get(&rep, conversion.contact.id).await.unwrap().id, conversion.contact.id);
}

#[tokio::test]
async fn test_deleting_company_detaches_contacts() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let company = insert_company(&app, &rep, "Acme").await;
    let mut input = contact_input("Jane", "jane@example.com");
    input.company_id = Some(company.id);
    let contact = app
        .contact_store
        .create(&app.connections.crm, &input, rep.user_id())
        .await
        .unwrap();
    let companies = CompanyCoordinator::new(app.clone());

    companies.delete(&rep, company.id).await.unwrap();

    assert!(matches!(
        companies.get(&rep, company.id).await,
        Err(CrmError::NotFound { resource: "Company", .. })
    ));
    let contact = ContactCoordinator::new(app.clone()).get(&rep, contact.id).await.unwrap();
    assert!(contact.company_id.is_none());
}
