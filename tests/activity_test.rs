mod common;

use chrono::{Duration, Utc};
use crm_backend::coordinators::{ActivityCoordinator, ResourceCoordinator};
use crm_backend::errors::CrmError;
use crm_backend::types::db::activity::ActivityType;
use crm_backend::types::dto::activity::{ActivityFilter, ActivityInput};
use crm_backend::types::dto::PageRequest;
use crm_backend::types::internal::EntityRef;

use common::*;

const WRITER: &[&str] = &["view-activities", "create-activities"];

fn note(subject: EntityRef, description: &str) -> ActivityInput {
    ActivityInput {
        description: description.to_string(),
        kind: ActivityType::Call,
        subject,
        activity_date: None,
    }
}

#[tokio::test]
async fn test_create_records_caller_as_author() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep", WRITER).await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let activities = ActivityCoordinator::new(app.clone());

    let activity = activities
        .create(&rep, &note(EntityRef::Contact(contact.id), "Intro call"))
        .await
        .unwrap();

    assert_eq!(activity.user_id, rep.user_id());
    assert_eq!(activity.subject(), EntityRef::Contact(contact.id));
    assert!(activity.activity_date <= Utc::now());
}

#[tokio::test]
async fn test_create_checks_permission_and_subject() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep", WRITER).await;
    let reader = user_with(&app, "Reader", &["view-activities"]).await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let activities = ActivityCoordinator::new(app.clone());

    let denied = activities
        .create(&reader, &note(EntityRef::Contact(contact.id), "Intro call"))
        .await;
    assert!(matches!(denied, Err(CrmError::Forbidden { action: "create", .. })));

    let missing = activities.create(&rep, &note(EntityRef::Deal(31), "Lost call")).await;
    assert!(matches!(missing, Err(CrmError::NotFound { resource: "Deal", id: 31 })));

    let blank = activities.create(&rep, &note(EntityRef::Contact(contact.id), "  ")).await;
    assert!(matches!(blank, Err(CrmError::Validation(_))));
}

#[tokio::test]
async fn test_author_deletes_own_activity_without_permissions() {
    let app = setup_app().await;
    let author = user_with(&app, "Author", WRITER).await;
    let contact = insert_contact(&app, &author, "Jane", "jane@example.com").await;
    let activities = ActivityCoordinator::new(app.clone());
    let mine = activities
        .create(&author, &note(EntityRef::Contact(contact.id), "Mine"))
        .await
        .unwrap();
    let other = user_with(&app, "Other", WRITER).await;
    let theirs = activities
        .create(&other, &note(EntityRef::Contact(contact.id), "Theirs"))
        .await
        .unwrap();

    assert!(matches!(activities.delete(&author, theirs.id).await, Err(CrmError::Forbidden { .. })));
    activities.delete(&author, mine.id).await.unwrap();

    let moderator = user_with(&app, "Moderator", &["delete-activities"]).await;
    activities.delete(&moderator, theirs.id).await.unwrap();
}

#[tokio::test]
async fn test_moderator_can_edit_others_activity() {
    let app = setup_app().await;
    let author = user_with(&app, "Author", WRITER).await;
    let moderator = user_with(&app, "Moderator", &["view-all-activities"]).await;
    let bystander = user_with(&app, "Bystander", WRITER).await;
    let contact = insert_contact(&app, &author, "Jane", "jane@example.com").await;
    let activities = ActivityCoordinator::new(app.clone());
    let activity = activities
        .create(&author, &note(EntityRef::Contact(contact.id), "Draft"))
        .await
        .unwrap();

    let edit = note(EntityRef::Contact(contact.id), "Edited");
    assert!(matches!(
        activities.update(&bystander, activity.id, &edit).await,
        Err(CrmError::Forbidden { .. })
    ));

    let edited = activities.update(&moderator, activity.id, &edit).await.unwrap();
    assert_eq!(edited.description, "Edited");
    assert_eq!(edited.user_id, author.user_id());
}

#[tokio::test]
async fn test_listing_is_scoped_to_author() {
    let app = setup_app().await;
    let alice = user_with(&app, "Alice", WRITER).await;
    let bob = user_with(&app, "Bob", WRITER).await;
    let contact = insert_contact(&app, &alice, "Jane", "jane@example.com").await;
    let activities = ActivityCoordinator::new(app.clone());
    activities
        .create(&alice, &note(EntityRef::Contact(contact.id), "Alice called"))
        .await
        .unwrap();
    activities
        .create(&bob, &note(EntityRef::Contact(contact.id), "Bob called"))
        .await
        .unwrap();

    let filter = ActivityFilter {
        subject: Some(EntityRef::Contact(contact.id)),
        ..Default::default()
    };
    let page = activities.list(&alice, &filter, PageRequest::default()).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].description, "Alice called");
}

#[tokio::test]
async fn test_recent_is_newest_first_and_clamped() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep", WRITER).await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let activities = ActivityCoordinator::new(app.clone());
    for days_ago in [3, 1, 2] {
        let mut input = note(EntityRef::Contact(contact.id), &format!("{} days ago", days_ago));
        input.activity_date = Some(Utc::now() - Duration::days(days_ago));
        activities.create(&rep, &input).await.unwrap();
    }

    let recent = activities.recent(&rep, None).await.unwrap();
    let descriptions: Vec<_> = recent.iter().map(|a| a.description.as_str()).collect();
    assert_eq!(descriptions, vec!["1 days ago", "2 days ago", "3 days ago"]);

    assert_eq!(activities.recent(&rep, Some(0)).await.unwrap().len(), 1);
}
