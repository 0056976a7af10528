//! Handlers for categories. Reading is public; mutation is staff-only.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use servdesk_core::access::{authorize, Operation, Resource};
use servdesk_core::category::validate_name;
use servdesk_core::error::CoreError;
use servdesk_core::images::validate_image;
use servdesk_core::types::DbId;
use servdesk_db::models::category::{Category, CreateCategory, UpdateCategory};

use crate::error::{AppError, AppResult};
use crate::forms::FormData;
use crate::media::MediaKind;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /categories
pub async fn list(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    authorize(&caller.actor(), Operation::Read, &Resource::Category)?;
    let categories = state.store.list_categories().await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /categories/create
///
/// Multipart fields: `name`, `image` (optional file).
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    authorize(&user.actor(), Operation::Create, &Resource::Category)?;

    let mut form = FormData::from_multipart(multipart).await?;
    let name = form.required_text("name")?.trim().to_string();
    validate_name(&name)?;

    let image = store_image(&state, &mut form).await?;
    let created = state
        .store
        .create_category(&CreateCategory {
            name,
            image: image.clone(),
        })
        .await;
    let category = match created {
        Ok(category) => category,
        Err(e) => {
            discard(&state, image.as_deref()).await;
            return Err(e.into());
        }
    };

    tracing::info!(category_id = category.id, staff_id = user.user_id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// POST /categories/{id}/update
///
/// Multipart fields: `name` (optional), `image` (optional file). Omitted
/// fields keep their current value.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Category>>> {
    authorize(&user.actor(), Operation::Update, &Resource::Category)?;

    let mut form = FormData::from_multipart(multipart).await?;
    let name = form.text("name").map(|n| n.trim().to_string());
    if let Some(name) = &name {
        validate_name(name)?;
    }

    let current = state
        .store
        .find_category(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    let image = store_image(&state, &mut form).await?;
    let updated = state
        .store
        .update_category(
            id,
            &UpdateCategory {
                name,
                image: image.clone(),
            },
        )
        .await;
    let category = match updated {
        Ok(Some(category)) => category,
        Ok(None) => {
            discard(&state, image.as_deref()).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Category",
                id,
            }));
        }
        Err(e) => {
            discard(&state, image.as_deref()).await;
            return Err(e.into());
        }
    };

    // A replaced picture is no longer referenced.
    if image.is_some() {
        discard(&state, current.image.as_deref()).await;
    }

    tracing::info!(category_id = id, staff_id = user.user_id, "Category updated");
    Ok(Json(DataResponse { data: category }))
}

/// POST /categories/{id}/delete
///
/// Deletes the category's applications with it.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    authorize(&user.actor(), Operation::Delete, &Resource::Category)?;

    let deleted = state.store.delete_category(id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }

    tracing::info!(category_id = id, staff_id = user.user_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn store_image(state: &AppState, form: &mut FormData) -> AppResult<Option<String>> {
    match form.take_file("image") {
        Some(upload) => {
            let image = validate_image(upload)?;
            Ok(Some(state.media.save(MediaKind::Category, &image).await?))
        }
        None => Ok(None),
    }
}

async fn discard(state: &AppState, reference: Option<&str>) {
    if let Some(reference) = reference {
        state.media.remove(reference).await;
    }
}
