//! Application workflow service.
//!
//! Binds the authorization gate, the pure workflow engine and the store.
//! Every operation follows the same order: load, authorize, validate, then
//! write conditionally on the status that was observed. A conditional write
//! that matches nothing means another request changed the application first,
//! and is reported as `InvalidTransition`.

use servdesk_core::access::{authorize, Actor, Operation, Resource};
use servdesk_core::application::validate_submission;
use servdesk_core::error::CoreError;
use servdesk_core::images::{validate_image, ImageUpload, ValidatedImage};
use servdesk_core::status::ApplicationStatus;
use servdesk_core::types::DbId;
use servdesk_core::workflow::{ensure_deletable, plan_transition, TransitionPlan, MUTABLE_STATUS};
use servdesk_db::models::application::{Application, CreateApplication, StatusChange};

use crate::error::{AppError, AppResult};
use crate::media::MediaKind;
use crate::state::AppState;

/// A new application as submitted by its owner.
#[derive(Debug)]
pub struct Submission {
    pub title: String,
    pub description: String,
    pub category_id: Option<DbId>,
    pub image: Option<ImageUpload>,
}

/// A staff request to move an application out of `new`.
#[derive(Debug)]
pub struct TransitionRequest {
    pub target: ApplicationStatus,
    pub admin_comment: Option<String>,
    pub design_image: Option<ImageUpload>,
}

fn resource_of(app: &Application) -> Resource {
    Resource::Application {
        owner_id: app.user_id,
        status: app.status,
    }
}

async fn load(state: &AppState, id: DbId) -> AppResult<Application> {
    state
        .store
        .find_application(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Application",
            id,
        }))
}

/// Load an application the actor is allowed to read.
pub async fn read(state: &AppState, actor: &Actor, id: DbId) -> AppResult<Application> {
    let app = load(state, id).await?;
    authorize(actor, Operation::Read, &resource_of(&app))?;
    Ok(app)
}

/// Create an application in `new`, owned by the actor.
pub async fn submit(state: &AppState, actor: &Actor, input: Submission) -> AppResult<Application> {
    authorize(actor, Operation::Create, &Resource::Applications)?;
    let user_id = actor.user_id().ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Authentication required".into()))
    })?;

    let title = input.title.trim();
    let description = input.description.trim();
    validate_submission(title, description)?;

    if let Some(category_id) = input.category_id {
        state
            .store
            .find_category(category_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Category",
                id: category_id,
            }))?;
    }

    let image = input.image.map(validate_image).transpose()?;
    let image_ref = match &image {
        Some(image) => Some(state.media.save(MediaKind::Application, image).await?),
        None => None,
    };

    let create = CreateApplication {
        title: title.to_string(),
        description: description.to_string(),
        category_id: input.category_id,
        user_id,
        image: image_ref.clone(),
    };
    let app = match state.store.create_application(&create).await {
        Ok(app) => app,
        Err(e) => {
            if let Some(reference) = &image_ref {
                state.media.remove(reference).await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        application_id = app.id,
        user_id,
        category_id = ?app.category_id,
        "Application submitted"
    );
    Ok(app)
}

/// Delete an application that is still `new`.
pub async fn delete(state: &AppState, actor: &Actor, id: DbId) -> AppResult<()> {
    let app = load(state, id).await?;
    delete_loaded(state, actor, &app).await
}

/// Delete `app` as it was observed when loaded. The write only succeeds if
/// the stored application is still `new`.
pub async fn delete_loaded(state: &AppState, actor: &Actor, app: &Application) -> AppResult<()> {
    let id = app.id;
    authorize(actor, Operation::Delete, &resource_of(app))?;
    ensure_deletable(app.status)?;

    let deleted = state
        .store
        .delete_application_if_status(id, MUTABLE_STATUS)
        .await?;
    if !deleted {
        return Err(changed_concurrently(id));
    }

    tracing::info!(application_id = id, user_id = ?actor.user_id(), "Application deleted");
    Ok(())
}

/// Move an application from `new` to `in_progress` or `completed`.
pub async fn transition(
    state: &AppState,
    actor: &Actor,
    id: DbId,
    request: TransitionRequest,
) -> AppResult<Application> {
    let app = load(state, id).await?;
    transition_loaded(state, actor, &app, request).await
}

/// Transition `app` as it was observed when loaded. The write only succeeds
/// if the stored application is still `new`.
pub async fn transition_loaded(
    state: &AppState,
    actor: &Actor,
    app: &Application,
    request: TransitionRequest,
) -> AppResult<Application> {
    let id = app.id;
    authorize(actor, Operation::Transition, &resource_of(app))?;

    // Only a completion carries a design image; anything sent with another
    // target is ignored.
    let design_image: Option<ValidatedImage> = match request.target {
        ApplicationStatus::Completed => request.design_image.map(validate_image).transpose()?,
        _ => None,
    };

    let plan = plan_transition(
        app.status,
        request.target,
        request.admin_comment.as_deref(),
        design_image.as_ref(),
    )?;

    let change = match &plan {
        TransitionPlan::Accept { admin_comment } => StatusChange {
            to: plan.target(),
            admin_comment: Some(admin_comment.clone()),
            design_image: None,
        },
        TransitionPlan::Complete { design_image } => StatusChange {
            to: plan.target(),
            admin_comment: None,
            design_image: Some(state.media.save(MediaKind::Design, design_image).await?),
        },
    };

    let updated = state
        .store
        .change_application_status_if(id, MUTABLE_STATUS, &change)
        .await;
    let updated = match updated {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            discard_upload(state, &change).await;
            return Err(changed_concurrently(id));
        }
        Err(e) => {
            discard_upload(state, &change).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        application_id = id,
        from = %app.status,
        to = %updated.status,
        staff_id = ?actor.user_id(),
        "Application status changed"
    );
    Ok(updated)
}

async fn discard_upload(state: &AppState, change: &StatusChange) {
    if let Some(reference) = &change.design_image {
        state.media.remove(reference).await;
    }
}

fn changed_concurrently(id: DbId) -> AppError {
    tracing::debug!(application_id = id, "Conditional write matched no row");
    AppError::Core(CoreError::InvalidTransition(
        "The application was changed by another request".to_string(),
    ))
}
