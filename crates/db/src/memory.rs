//! In-memory store for development and tests.
//!
//! Mirrors the PostgreSQL repositories' contract: unique constraints are
//! reported with the same constraint names, category deletion cascades to
//! applications, and conditional status writes check and write under one
//! lock so they serialize exactly like the SQL `WHERE status = $expected`.

use std::collections::BTreeMap;

use chrono::Utc;
use parking_lot::RwLock;
use servdesk_core::status::ApplicationStatus;
use servdesk_core::types::DbId;

use crate::models::application::{Application, CreateApplication, StatusChange};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::user::{CreateUser, User, UserProfile, UserWithProfile};
use crate::store::StoreError;

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    profiles: BTreeMap<DbId, UserProfile>,
    categories: BTreeMap<DbId, Category>,
    applications: BTreeMap<DbId, Application>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory database. All data is lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

fn newest_first(apps: &mut [Application]) {
    apps.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user_with_profile(
        &self,
        input: &CreateUser,
    ) -> Result<UserWithProfile, StoreError> {
        let mut t = self.tables.write();

        if t.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::UniqueViolation("uq_users_username".into()));
        }
        if t.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation("uq_users_email".into()));
        }

        let now = Utc::now();
        let id = t.next_id();
        let user = User {
            id,
            username: input.username.clone(),
            email: input.email.clone(),
            full_name: input.full_name.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        let profile = UserProfile {
            user_id: id,
            is_employee: input.is_employee,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(id, user.clone());
        t.profiles.insert(id, profile.clone());
        Ok(UserWithProfile { user, profile })
    }

    pub async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    pub async fn find_profile(&self, user_id: DbId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.tables.read().profiles.get(&user_id).cloned())
    }

    pub async fn set_employee(
        &self,
        user_id: DbId,
        is_employee: bool,
    ) -> Result<Option<UserWithProfile>, StoreError> {
        let mut t = self.tables.write();
        let now = Utc::now();

        let Some(user) = t.users.get_mut(&user_id) else {
            return Ok(None);
        };
        user.updated_at = now;
        let user = user.clone();

        let profile = t.profiles.entry(user_id).or_insert_with(|| UserProfile {
            user_id,
            is_employee,
            created_at: now,
            updated_at: now,
        });
        profile.is_employee = is_employee;
        profile.updated_at = now;
        let profile = profile.clone();

        Ok(Some(UserWithProfile { user, profile }))
    }

    // ============================================
    // Categories
    // ============================================

    pub async fn create_category(&self, input: &CreateCategory) -> Result<Category, StoreError> {
        let mut t = self.tables.write();
        if t.categories.values().any(|c| c.name == input.name) {
            return Err(StoreError::UniqueViolation("uq_categories_name".into()));
        }
        let now = Utc::now();
        let id = t.next_id();
        let category = Category {
            id,
            name: input.name.clone(),
            image: input.image.clone(),
            created_at: now,
            updated_at: now,
        };
        t.categories.insert(id, category.clone());
        Ok(category)
    }

    pub async fn find_category(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        Ok(self.tables.read().categories.get(&id).cloned())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<Category> =
            self.tables.read().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    pub async fn update_category(
        &self,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, StoreError> {
        let mut t = self.tables.write();
        if let Some(name) = &input.name {
            if t.categories.values().any(|c| c.id != id && &c.name == name) {
                return Err(StoreError::UniqueViolation("uq_categories_name".into()));
            }
        }
        let Some(category) = t.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            category.name = name.clone();
        }
        if let Some(image) = &input.image {
            category.image = Some(image.clone());
        }
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    pub async fn delete_category(&self, id: DbId) -> Result<bool, StoreError> {
        let mut t = self.tables.write();
        if t.categories.remove(&id).is_none() {
            return Ok(false);
        }
        let before = t.applications.len();
        t.applications.retain(|_, app| app.category_id != Some(id));
        tracing::debug!(
            category_id = id,
            cascaded = before - t.applications.len(),
            "Deleted category"
        );
        Ok(true)
    }

    // ============================================
    // Applications
    // ============================================

    pub async fn create_application(
        &self,
        input: &CreateApplication,
    ) -> Result<Application, StoreError> {
        let mut t = self.tables.write();
        let now = Utc::now();
        let id = t.next_id();
        let app = Application {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            category_id: input.category_id,
            user_id: input.user_id,
            image: input.image.clone(),
            status: ApplicationStatus::New,
            admin_comment: None,
            design_image: None,
            created_at: now,
            updated_at: now,
        };
        t.applications.insert(id, app.clone());
        Ok(app)
    }

    pub async fn find_application(&self, id: DbId) -> Result<Option<Application>, StoreError> {
        Ok(self.tables.read().applications.get(&id).cloned())
    }

    pub async fn list_applications_by_user(
        &self,
        user_id: DbId,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, StoreError> {
        let mut apps: Vec<Application> = self
            .tables
            .read()
            .applications
            .values()
            .filter(|a| a.user_id == user_id && status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        newest_first(&mut apps);
        Ok(apps)
    }

    pub async fn list_all_applications(&self) -> Result<Vec<Application>, StoreError> {
        let mut apps: Vec<Application> =
            self.tables.read().applications.values().cloned().collect();
        newest_first(&mut apps);
        Ok(apps)
    }

    pub async fn count_applications_by_status(
        &self,
        status: ApplicationStatus,
    ) -> Result<i64, StoreError> {
        let count = self
            .tables
            .read()
            .applications
            .values()
            .filter(|a| a.status == status)
            .count();
        Ok(count as i64)
    }

    pub async fn list_recent_applications_by_status(
        &self,
        status: ApplicationStatus,
        limit: i64,
    ) -> Result<Vec<Application>, StoreError> {
        let mut apps: Vec<Application> = self
            .tables
            .read()
            .applications
            .values()
            .filter(|a| a.status == status)
            .cloned()
            .collect();
        apps.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        apps.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(apps)
    }

    pub async fn delete_application_if_status(
        &self,
        id: DbId,
        expected: ApplicationStatus,
    ) -> Result<bool, StoreError> {
        let mut t = self.tables.write();
        match t.applications.get(&id) {
            Some(app) if app.status == expected => {
                t.applications.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn change_application_status_if(
        &self,
        id: DbId,
        expected: ApplicationStatus,
        change: &StatusChange,
    ) -> Result<Option<Application>, StoreError> {
        let mut t = self.tables.write();
        let Some(app) = t.applications.get_mut(&id) else {
            return Ok(None);
        };
        if app.status != expected {
            return Ok(None);
        }
        app.status = change.to;
        if let Some(comment) = &change.admin_comment {
            app.admin_comment = Some(comment.clone());
        }
        if let Some(image) = &change.design_image {
            app.design_image = Some(image.clone());
        }
        app.updated_at = Utc::now();
        Ok(Some(app.clone()))
    }
}
