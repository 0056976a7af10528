//! Handlers for registration, login and the caller's profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use servdesk_core::error::CoreError;
use servdesk_core::registration::{validate_registration, RegistrationInput};
use servdesk_db::models::user::{CreateUser, UserResponse, UserWithProfile};

use crate::auth::credentials::{authenticate, hash_password};
use crate::auth::jwt::issue_access_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /register
///
/// Create an identity and its profile, then sign the new user in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegistrationInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let input = validate_registration(input)?;
    let password_hash = hash_password(&input.password)?;

    let account = state
        .store
        .create_user_with_profile(&CreateUser {
            username: input.username,
            email: input.email,
            full_name: input.full_name,
            password_hash,
            is_employee: false,
        })
        .await?;

    tracing::info!(user_id = account.user.id, username = %account.user.username, "User registered");

    Ok((StatusCode::CREATED, Json(auth_response(&state, &account)?)))
}

/// POST /login
///
/// Authenticate with username + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let account = authenticate(&state.store, &input.username, &input.password).await?;

    tracing::info!(user_id = account.user.id, "User logged in");
    Ok(Json(auth_response(&state, &account)?))
}

/// GET /profile
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let account = state
        .store
        .find_account(user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&account),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_response(state: &AppState, account: &UserWithProfile) -> AppResult<AuthResponse> {
    let issued = issue_access_token(account, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
        user: UserResponse::from(account),
    })
}
