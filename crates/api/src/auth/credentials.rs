//! Account credentials.
//!
//! Passwords are stored as Argon2id PHC strings, so the salt and parameters
//! travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use servdesk_core::error::CoreError;
use servdesk_db::models::user::UserWithProfile;
use servdesk_db::Store;

use crate::error::{AppError, AppResult};

/// Hash a new account password.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Sign in with a username and password.
///
/// An unknown username and a wrong password are reported identically.
pub async fn authenticate(
    store: &Store,
    username: &str,
    password: &str,
) -> AppResult<UserWithProfile> {
    let Some(user) = store.find_user_by_username(username.trim()).await? else {
        tracing::info!(username, "Login rejected: unknown user");
        return Err(invalid_credentials());
    };

    if !password_matches(password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    store
        .find_account(user.id)
        .await?
        .ok_or_else(invalid_credentials)
}

fn password_matches(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash is unreadable: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::InternalError(format!(
            "Password verification error: {e}"
        ))),
    }
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use servdesk_db::models::user::CreateUser;

    use super::*;

    async fn store_with_account(username: &str, password: &str) -> Store {
        let store = Store::in_memory();
        store
            .create_user_with_profile(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                full_name: "Account Holder".to_string(),
                password_hash: hash_password(password).unwrap(),
                is_employee: false,
            })
            .await
            .unwrap();
        store
    }

    #[test]
    fn hashes_are_salted_argon2id() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn correct_password_signs_in() {
        let store = store_with_account("maria", "hunter22").await;
        let account = authenticate(&store, "maria", "hunter22").await.unwrap();
        assert_eq!(account.user.username, "maria");
        assert!(!account.profile.is_employee);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let store = store_with_account("maria", "hunter22").await;

        let wrong = authenticate(&store, "maria", "hunter23").await;
        let unknown = authenticate(&store, "nobody", "hunter22").await;

        assert_matches!(wrong, Err(AppError::Core(CoreError::Unauthorized(ref m))) if m == "Invalid username or password");
        assert_matches!(unknown, Err(AppError::Core(CoreError::Unauthorized(ref m))) if m == "Invalid username or password");
    }

    #[tokio::test]
    async fn unreadable_stored_hash_is_internal() {
        let store = Store::in_memory();
        store
            .create_user_with_profile(&CreateUser {
                username: "legacy".to_string(),
                email: "legacy@example.com".to_string(),
                full_name: "Legacy".to_string(),
                password_hash: "plain-text".to_string(),
                is_employee: false,
            })
            .await
            .unwrap();

        let result = authenticate(&store, "legacy", "plain-text").await;
        assert_matches!(result, Err(AppError::InternalError(_)));
    }
}
