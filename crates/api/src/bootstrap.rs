//! Startup tasks that run before the server accepts requests.

use servdesk_db::models::user::{CreateUser, UserWithProfile};
use servdesk_db::Store;

use crate::auth::credentials::hash_password;
use crate::config::StaffBootstrap;
use crate::error::{AppError, AppResult};

/// Make sure the configured staff account exists and is an employee.
///
/// An existing user with that username is promoted; its password is left
/// untouched.
pub async fn ensure_staff_account(
    store: &Store,
    staff: &StaffBootstrap,
) -> AppResult<UserWithProfile> {
    if let Some(user) = store.find_user_by_username(&staff.username).await? {
        let account = store.set_employee(user.id, true).await?.ok_or_else(|| {
            AppError::InternalError(format!("Staff user {} vanished during bootstrap", user.id))
        })?;
        tracing::info!(user_id = account.user.id, "Existing staff account ensured");
        return Ok(account);
    }

    let password_hash = hash_password(&staff.password)?;
    let account = store
        .create_user_with_profile(&CreateUser {
            username: staff.username.clone(),
            email: staff.email.clone(),
            full_name: staff.username.clone(),
            password_hash,
            is_employee: true,
        })
        .await?;

    tracing::info!(user_id = account.user.id, "Staff account created");
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> StaffBootstrap {
        StaffBootstrap {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            password: "admin-password".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_staff_account_once() {
        let store = Store::in_memory();

        let first = ensure_staff_account(&store, &staff()).await.unwrap();
        assert!(first.profile.is_employee);

        let second = ensure_staff_account(&store, &staff()).await.unwrap();
        assert_eq!(first.user.id, second.user.id);
        assert!(second.profile.is_employee);
    }

    #[tokio::test]
    async fn promotes_existing_user() {
        let store = Store::in_memory();
        let existing = store
            .create_user_with_profile(&CreateUser {
                username: "admin".to_string(),
                email: "someone@example.com".to_string(),
                full_name: "Someone".to_string(),
                password_hash: "hash".to_string(),
                is_employee: false,
            })
            .await
            .unwrap();

        let account = ensure_staff_account(&store, &staff()).await.unwrap();
        assert_eq!(account.user.id, existing.user.id);
        assert!(account.profile.is_employee);
    }
}
