//! Tests for the workflow service called directly, without HTTP.

mod common;

use assert_matches::assert_matches;
use servdesk_api::error::AppError;
use servdesk_api::workflow::{self, Submission, TransitionRequest};
use servdesk_core::access::Actor;
use servdesk_core::error::CoreError;
use servdesk_core::status::ApplicationStatus;

fn submission(title: &str) -> Submission {
    Submission {
        title: title.to_string(),
        description: "Please fix it".to_string(),
        category_id: None,
        image: None,
    }
}

fn accept(comment: &str) -> TransitionRequest {
    TransitionRequest {
        target: ApplicationStatus::InProgress,
        admin_comment: Some(comment.to_string()),
        design_image: None,
    }
}

#[tokio::test]
async fn anonymous_cannot_submit() {
    let test = common::build_test_app();
    let result = workflow::submit(&test.state, &Actor::Anonymous, submission("Nope")).await;
    assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));
}

#[tokio::test]
async fn scheduled_application_cannot_be_deleted() {
    let test = common::build_test_app();
    let (owner_id, _) = common::create_user(&test.state, "owner", false).await;
    let (staff_id, _) = common::create_user(&test.state, "staff", true).await;
    let owner = Actor::User { id: owner_id, is_employee: false };
    let staff = Actor::User { id: staff_id, is_employee: true };

    let app = workflow::submit(&test.state, &owner, submission("Tap")).await.unwrap();
    assert_eq!(app.status, ApplicationStatus::New);

    let accepted = workflow::transition(&test.state, &staff, app.id, accept("Scheduled"))
        .await
        .unwrap();
    assert_eq!(accepted.status, ApplicationStatus::InProgress);
    assert_eq!(accepted.admin_comment.as_deref(), Some("Scheduled"));
    assert!(accepted.updated_at >= app.updated_at);
    assert_eq!(accepted.created_at, app.created_at);

    let result = workflow::delete(&test.state, &owner, app.id).await;
    assert_matches!(result, Err(AppError::Core(CoreError::InvalidTransition(_))));
}

#[tokio::test]
async fn transition_on_a_stale_snapshot_loses_to_delete() {
    let test = common::build_test_app();
    let (owner_id, _) = common::create_user(&test.state, "owner", false).await;
    let (staff_id, _) = common::create_user(&test.state, "staff", true).await;
    let owner = Actor::User { id: owner_id, is_employee: false };
    let staff = Actor::User { id: staff_id, is_employee: true };

    let app = workflow::submit(&test.state, &owner, submission("Race")).await.unwrap();
    // Both requests have read the application while it was `new`.
    let seen_by_owner = workflow::read(&test.state, &owner, app.id).await.unwrap();
    let seen_by_staff = workflow::read(&test.state, &staff, app.id).await.unwrap();

    workflow::delete_loaded(&test.state, &owner, &seen_by_owner).await.unwrap();
    let result =
        workflow::transition_loaded(&test.state, &staff, &seen_by_staff, accept("Scheduled")).await;

    assert_matches!(result, Err(AppError::Core(CoreError::InvalidTransition(_))));
    assert!(test.state.store.find_application(app.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_on_a_stale_snapshot_loses_to_transition() {
    let test = common::build_test_app();
    let (owner_id, _) = common::create_user(&test.state, "owner", false).await;
    let (staff_id, _) = common::create_user(&test.state, "staff", true).await;
    let owner = Actor::User { id: owner_id, is_employee: false };
    let staff = Actor::User { id: staff_id, is_employee: true };

    let app = workflow::submit(&test.state, &owner, submission("Race")).await.unwrap();
    let seen_by_owner = workflow::read(&test.state, &owner, app.id).await.unwrap();
    let seen_by_staff = workflow::read(&test.state, &staff, app.id).await.unwrap();

    let accepted =
        workflow::transition_loaded(&test.state, &staff, &seen_by_staff, accept("Scheduled"))
            .await
            .unwrap();
    assert_eq!(accepted.status, ApplicationStatus::InProgress);

    let result = workflow::delete_loaded(&test.state, &owner, &seen_by_owner).await;
    assert_matches!(result, Err(AppError::Core(CoreError::InvalidTransition(_))));

    let stored = test.state.store.find_application(app.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ApplicationStatus::InProgress);
    assert_eq!(stored.admin_comment.as_deref(), Some("Scheduled"));
}

#[tokio::test]
async fn two_staff_transitions_on_the_same_snapshot_have_one_winner() {
    let test = common::build_test_app();
    let (owner_id, _) = common::create_user(&test.state, "owner", false).await;
    let (staff_id, _) = common::create_user(&test.state, "staff", true).await;
    let owner = Actor::User { id: owner_id, is_employee: false };
    let staff = Actor::User { id: staff_id, is_employee: true };

    let app = workflow::submit(&test.state, &owner, submission("Race")).await.unwrap();
    let snapshot = workflow::read(&test.state, &staff, app.id).await.unwrap();

    workflow::transition_loaded(&test.state, &staff, &snapshot, accept("First"))
        .await
        .unwrap();
    let second =
        workflow::transition_loaded(&test.state, &staff, &snapshot, accept("Second")).await;

    assert_matches!(second, Err(AppError::Core(CoreError::InvalidTransition(_))));
    let stored = test.state.store.find_application(app.id).await.unwrap().unwrap();
    assert_eq!(stored.admin_comment.as_deref(), Some("First"));
}
