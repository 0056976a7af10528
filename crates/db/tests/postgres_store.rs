//! Integration tests for the PostgreSQL repositories.
//!
//! Exercises the repository layer against a real database:
//! - Account creation (user + profile in one transaction)
//! - Unique constraint classification
//! - Conditional status writes
//! - Category cascade delete
//!
//! These need a reachable PostgreSQL via `DATABASE_URL`; run them with
//! `cargo test -p servdesk-db -- --ignored`.

use assert_matches::assert_matches;
use servdesk_core::status::ApplicationStatus;
use servdesk_db::models::application::{CreateApplication, StatusChange};
use servdesk_db::models::category::CreateCategory;
use servdesk_db::models::user::CreateUser;
use servdesk_db::repositories::{ApplicationRepo, CategoryRepo, UserRepo};
use servdesk_db::{Store, StoreError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        full_name: "Test User".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        is_employee: false,
    }
}

fn new_application(user_id: i64, category_id: Option<i64>) -> CreateApplication {
    CreateApplication {
        title: "Leaking tap".to_string(),
        description: "Kitchen tap drips all night".to_string(),
        category_id,
        user_id,
        image: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_user_with_profile(pool: PgPool) {
    let account = UserRepo::create_with_profile(&pool, &new_user("anna"))
        .await
        .unwrap();
    assert_eq!(account.profile.user_id, account.user.id);
    assert!(!account.profile.is_employee);

    let profile = UserRepo::find_profile(&pool, account.user.id)
        .await
        .unwrap()
        .expect("profile must exist");
    assert_eq!(profile.user_id, account.user.id);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_username_is_unique_violation(pool: PgPool) {
    let store = Store::Postgres(pool.clone());
    store.create_user_with_profile(&new_user("anna")).await.unwrap();

    let dup = store.create_user_with_profile(&new_user("anna")).await;
    assert_matches!(dup, Err(StoreError::UniqueViolation(c)) if c == "uq_users_username");

    // The failed transaction must not leave an orphan profile behind.
    let profiles: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_profiles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(profiles.0, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_set_employee_syncs_profile(pool: PgPool) {
    let account = UserRepo::create_with_profile(&pool, &new_user("staff"))
        .await
        .unwrap();
    let updated = UserRepo::set_employee(&pool, account.user.id, true)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.profile.is_employee);
    assert!(UserRepo::set_employee(&pool, 999_999, true).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_conditional_status_change(pool: PgPool) {
    let owner = UserRepo::create_with_profile(&pool, &new_user("owner"))
        .await
        .unwrap();
    let app = ApplicationRepo::create(&pool, &new_application(owner.user.id, None))
        .await
        .unwrap();
    assert_eq!(app.status, ApplicationStatus::New);

    let change = StatusChange {
        to: ApplicationStatus::InProgress,
        admin_comment: Some("Scheduled".to_string()),
        design_image: None,
    };
    let updated = ApplicationRepo::change_status_if(&pool, app.id, ApplicationStatus::New, &change)
        .await
        .unwrap()
        .expect("first change must apply");
    assert_eq!(updated.status, ApplicationStatus::InProgress);
    assert_eq!(updated.admin_comment.as_deref(), Some("Scheduled"));
    assert!(updated.updated_at >= app.updated_at);

    let again = ApplicationRepo::change_status_if(&pool, app.id, ApplicationStatus::New, &change)
        .await
        .unwrap();
    assert!(again.is_none(), "a second change from 'new' must not match");

    let deleted = ApplicationRepo::delete_if_status(&pool, app.id, ApplicationStatus::New)
        .await
        .unwrap();
    assert!(!deleted, "accepted applications cannot be deleted");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_legacy_status_literal_is_rejected(pool: PgPool) {
    let owner = UserRepo::create_with_profile(&pool, &new_user("owner"))
        .await
        .unwrap();
    let app = ApplicationRepo::create(&pool, &new_application(owner.user.id, None))
        .await
        .unwrap();

    // The CHECK constraint rejects legacy literals outright.
    let result = sqlx::query("UPDATE applications SET status = 'n' WHERE id = $1")
        .bind(app.id)
        .execute(&pool)
        .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_category_delete_cascades(pool: PgPool) {
    let owner = UserRepo::create_with_profile(&pool, &new_user("owner"))
        .await
        .unwrap();
    let category = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Electrics".to_string(),
            image: None,
        },
    )
    .await
    .unwrap();
    let app = ApplicationRepo::create(&pool, &new_application(owner.user.id, Some(category.id)))
        .await
        .unwrap();

    assert!(CategoryRepo::delete(&pool, category.id).await.unwrap());
    assert!(ApplicationRepo::find_by_id(&pool, app.id).await.unwrap().is_none());
}
