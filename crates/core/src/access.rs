//! Authorization gate.
//!
//! Every workflow and category operation asks [`authorize`] before touching
//! the store. Permission is a pure function of the actor's role tags
//! (anonymous, owner of the target, staff), the operation and the resource.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. Anonymous: no mutation; may read categories and completed applications.
//! 2. Owner on own application: read and delete, never transition.
//! 3. Staff on any application: read and transition, never delete.
//! 4. Staff on categories: create, update, delete.
//! 5. Any authenticated user may read categories, read completed
//!    applications and submit applications; staff may list every
//!    application and update user accounts.
//! 6. Everything else is forbidden.

use crate::error::CoreError;
use crate::status::ApplicationStatus;
use crate::types::DbId;

/// Role name carried in access tokens for staff members.
pub const ROLE_EMPLOYEE: &str = "employee";
/// Role name carried in access tokens for ordinary customers.
pub const ROLE_CUSTOMER: &str = "customer";

/// Token role name for a profile's employee flag.
pub fn role_name(is_employee: bool) -> &'static str {
    if is_employee {
        ROLE_EMPLOYEE
    } else {
        ROLE_CUSTOMER
    }
}

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User { id: DbId, is_employee: bool },
}

impl Actor {
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            Self::Anonymous => None,
            Self::User { id, .. } => Some(*id),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::User { is_employee: true, .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
    /// Advance an application's status.
    Transition,
    /// See every application regardless of owner.
    ListAll,
}

/// What the operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// One existing application.
    Application {
        owner_id: DbId,
        status: ApplicationStatus,
    },
    /// The collection of applications (submit, list all).
    Applications,
    /// Categories, individually or as a list.
    Category,
    /// A user's identity and profile.
    UserAccount,
}

/// Allow or deny `operation` on `resource` for `actor`.
pub fn authorize(actor: &Actor, operation: Operation, resource: &Resource) -> Result<(), CoreError> {
    if is_allowed(actor, operation, resource) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(denial_message(actor, operation, resource)))
    }
}

fn is_allowed(actor: &Actor, operation: Operation, resource: &Resource) -> bool {
    use Operation::*;

    let (user_id, is_staff) = match *actor {
        Actor::Anonymous => {
            return match (operation, resource) {
                (Read, Resource::Category) => true,
                (Read, Resource::Application { status, .. }) => {
                    *status == ApplicationStatus::Completed
                }
                _ => false,
            };
        }
        Actor::User { id, is_employee } => (id, is_employee),
    };

    match *resource {
        Resource::Application { owner_id, .. } if owner_id == user_id => {
            matches!(operation, Read | Delete)
        }
        Resource::Application { .. } if is_staff => matches!(operation, Read | Transition),
        Resource::Application {
            status: ApplicationStatus::Completed,
            ..
        } => operation == Read,
        Resource::Category if is_staff => matches!(operation, Read | Create | Update | Delete),
        Resource::Category => operation == Read,
        Resource::Applications if is_staff => matches!(operation, Create | ListAll),
        Resource::Applications => operation == Create,
        Resource::UserAccount => is_staff && operation == Update,
        Resource::Application { .. } => false,
    }
}

fn denial_message(actor: &Actor, operation: Operation, resource: &Resource) -> String {
    match (actor, operation, resource) {
        (Actor::Anonymous, _, _) => "Authentication required".to_string(),
        (_, Operation::Transition, Resource::Application { .. }) if !actor.is_staff() => {
            "Staff role required to change application status".to_string()
        }
        (_, Operation::Transition, Resource::Application { .. }) => {
            "Staff cannot change the status of their own application".to_string()
        }
        (_, Operation::Delete, Resource::Application { .. }) => {
            "Only the owner can delete an application".to_string()
        }
        (_, _, Resource::Application { .. }) => {
            "You do not have access to this application".to_string()
        }
        (_, _, Resource::Category | Resource::UserAccount) | (_, Operation::ListAll, _) => {
            "Staff role required".to_string()
        }
        _ => "Operation not permitted".to_string(),
    }
}
