mod common;

use std::time::Duration;

use chrono::Utc;
use crm_backend::coordinators::{ResourceCoordinator, TaskCoordinator};
use crm_backend::errors::CrmError;
use crm_backend::types::db::task::TaskStatus;
use crm_backend::types::dto::task::TaskFilter;
use crm_backend::types::dto::PageRequest;
use crm_backend::types::internal::EntityRef;

use common::*;

const REP: &[&str] = &["view-tasks", "create-tasks", "edit-tasks", "delete-tasks"];

#[tokio::test]
async fn test_completing_twice_restamps_completed_at() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let task = insert_task(&app, &rep, EntityRef::Contact(contact.id)).await;
    let tasks = TaskCoordinator::new(app.clone());

    let first = tasks.complete_task(&rep, task.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = tasks.complete_task(&rep, task.id).await.unwrap();

    assert_eq!(first.status, TaskStatus::Completed);
    assert_eq!(second.status, TaskStatus::Completed);
    let (first_at, second_at) = (first.completed_at.unwrap(), second.completed_at.unwrap());
    assert!(second_at > first_at);
}

#[tokio::test]
async fn test_complete_requires_update_permission() {
    let app = setup_app().await;
    let owner = user_with(&app, "Owner", REP).await;
    let viewer = user_with(&app, "Viewer", &["view-all-tasks"]).await;
    let contact = insert_contact(&app, &owner, "Jane", "jane@example.com").await;
    let task = insert_task(&app, &owner, EntityRef::Contact(contact.id)).await;
    let tasks = TaskCoordinator::new(app.clone());

    assert!(matches!(
        tasks.complete_task(&viewer, task.id).await,
        Err(CrmError::Forbidden { .. })
    ));
    assert!(matches!(
        tasks.complete_task(&owner, 777).await,
        Err(CrmError::NotFound { resource: "Task", .. })
    ));
}

#[tokio::test]
async fn test_related_record_must_exist_and_be_allowed() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let company = insert_company(&app, &rep, "Acme").await;
    let tasks = TaskCoordinator::new(app.clone());

    let missing = tasks
        .create(&rep, &task_input("Call back", EntityRef::Deal(404), None))
        .await;
    match missing {
        Err(CrmError::Validation(fields)) => assert_eq!(fields[0].field, "related_to"),
        other => panic!("expected validation error, got {:?}", other),
    }

    let wrong_kind = tasks
        .create(&rep, &task_input("Call back", EntityRef::Company(company.id), None))
        .await;
    assert!(matches!(wrong_kind, Err(CrmError::Validation(_))));
}

#[tokio::test]
async fn test_update_back_to_pending_clears_completed_at() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let task = insert_task(&app, &rep, EntityRef::Contact(contact.id)).await;
    let tasks = TaskCoordinator::new(app.clone());
    tasks.complete_task(&rep, task.id).await.unwrap();

    let mut input = task_input("Follow up", EntityRef::Contact(contact.id), None);
    input.status = Some(TaskStatus::Pending);
    let reopened = tasks.update(&rep, task.id, &input).await.unwrap();

    assert_eq!(reopened.status, TaskStatus::Pending);
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn test_overdue_filter_skips_completed_tasks() {
    let app = setup_app().await;
    let rep = user_with(&app, "Rep One", REP).await;
    let contact = insert_contact(&app, &rep, "Jane", "jane@example.com").await;
    let tasks = TaskCoordinator::new(app.clone());
    let yesterday = Utc::now() - chrono::Duration::days(1);
    let tomorrow = Utc::now() + chrono::Duration::days(1);

    let late = tasks
        .create(&rep, &task_input("Late", EntityRef::Contact(contact.id), Some(yesterday)))
        .await
        .unwrap();
    let done = tasks
        .create(&rep, &task_input("Done", EntityRef::Contact(contact.id), Some(yesterday)))
        .await
        .unwrap();
    tasks
        .create(&rep, &task_input("Upcoming", EntityRef::Contact(contact.id), Some(tomorrow)))
        .await
        .unwrap();
    tasks.complete_task(&rep, done.id).await.unwrap();

    let filter = TaskFilter {
        overdue: true,
        ..Default::default()
    };
    let page = tasks.list(&rep, &filter, PageRequest::default()).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, late.id);
}
