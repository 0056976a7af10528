//! Application status workflow.
//!
//! ```text
//! new ──► in_progress   (requires a non-empty admin comment)
//!  │
//!  └────► completed     (requires a readable design image)
//! ```
//!
//! Both transitions leave `new` exactly once; `in_progress` and `completed`
//! are terminal as far as [`plan_transition`] is concerned, and nothing ever
//! moves back to `new`. Deletion is only possible while the application is
//! still `new`.
//!
//! The functions here only decide. Persisting a plan is the caller's job and
//! must be a conditional write keyed on the status observed here, so that a
//! concurrent transition or delete cannot slip in between.

use crate::error::CoreError;
use crate::images::ValidatedImage;
use crate::status::ApplicationStatus;

/// The status an application must be in to be deleted or transitioned.
pub const MUTABLE_STATUS: ApplicationStatus = ApplicationStatus::New;

/// A validated status change, ready to be written.
#[derive(Debug)]
pub enum TransitionPlan<'a> {
    /// `new` → `in_progress`, recording the staff comment.
    Accept { admin_comment: String },
    /// `new` → `completed`, recording the design image.
    Complete { design_image: &'a ValidatedImage },
}

impl TransitionPlan<'_> {
    pub fn target(&self) -> ApplicationStatus {
        match self {
            Self::Accept { .. } => ApplicationStatus::InProgress,
            Self::Complete { .. } => ApplicationStatus::Completed,
        }
    }
}

/// Whether an application in `status` may still be deleted by its owner.
pub fn can_be_deleted(status: ApplicationStatus) -> bool {
    status == MUTABLE_STATUS
}

/// Fail with `InvalidTransition` unless the application can be deleted.
pub fn ensure_deletable(status: ApplicationStatus) -> Result<(), CoreError> {
    if can_be_deleted(status) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition(
            "Cannot delete an application already accepted or completed".to_string(),
        ))
    }
}

/// Decide whether `current` may move to `target` with the given side data.
///
/// Field preconditions are checked first: a missing comment or design image
/// is always a `Validation` error. A well-formed request against an
/// application that has left `new` is an `InvalidTransition`.
pub fn plan_transition<'a>(
    current: ApplicationStatus,
    target: ApplicationStatus,
    admin_comment: Option<&str>,
    design_image: Option<&'a ValidatedImage>,
) -> Result<TransitionPlan<'a>, CoreError> {
    let plan = match target {
        ApplicationStatus::New => {
            return Err(CoreError::InvalidTransition(
                "An application cannot be moved back to 'new'".to_string(),
            ))
        }
        ApplicationStatus::InProgress => {
            let comment = admin_comment.map(str::trim).unwrap_or_default();
            if comment.is_empty() {
                return Err(CoreError::Validation(
                    "An admin comment is required to accept an application".to_string(),
                ));
            }
            TransitionPlan::Accept {
                admin_comment: comment.to_string(),
            }
        }
        ApplicationStatus::Completed => {
            let design_image = design_image.ok_or_else(|| {
                CoreError::Validation(
                    "A design image is required to complete an application".to_string(),
                )
            })?;
            TransitionPlan::Complete { design_image }
        }
    };

    if current != MUTABLE_STATUS {
        return Err(CoreError::InvalidTransition(format!(
            "Cannot change status from '{current}' to '{target}': only new applications can be changed"
        )));
    }

    Ok(plan)
}
