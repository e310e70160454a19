//! In-process store used by the test suite. Mirrors the PostgreSQL semantics:
//! unique emails, whole sub-document replacement, store-order catalog reads.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::catalog::filters::{JobRoleFilter, ScholarshipFilter};
use crate::errors::AppError;
use crate::models::catalog::{JobRole, Scholarship};
use crate::models::guidance::{AiBundle, BundleEntry};
use crate::models::profile::Profile;
use crate::models::psychometric::PsychometricSubmission;
use crate::models::user::User;
use crate::store::{user_not_found, CatalogStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    job_roles: Vec<JobRole>,
    scholarships: Vec<Scholarship>,
}

impl MemoryStore {
    pub fn with_catalog(job_roles: Vec<JobRole>, scholarships: Vec<Scholarship>) -> Self {
        Self {
            users: Mutex::default(),
            job_roles,
            scholarships,
        }
    }

    fn update<F>(&self, id: Uuid, apply: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(&id).ok_or_else(|| user_not_found(id))?;
        apply(user);
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
            profile: None,
            psychometric: None,
            ai: AiBundle::default(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError> {
        let users = self.users.lock().unwrap();
        users.get(&id).cloned().ok_or_else(|| user_not_found(id))
    }

    async fn update_profile(&self, id: Uuid, profile: &Profile) -> Result<(), AppError> {
        self.update(id, |user| user.profile = Some(profile.clone()))
    }

    async fn update_psychometric(
        &self,
        id: Uuid,
        submission: &PsychometricSubmission,
    ) -> Result<(), AppError> {
        self.update(id, |user| user.psychometric = Some(submission.clone()))
    }

    async fn update_ai_bundle(&self, id: Uuid, entry: BundleEntry) -> Result<(), AppError> {
        self.update(id, |user| entry.apply_to(&mut user.ai))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_job_roles(
        &self,
        filter: &JobRoleFilter,
        limit: usize,
    ) -> Result<Vec<JobRole>, AppError> {
        Ok(self
            .job_roles
            .iter()
            .filter(|role| filter.matches(role))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_scholarships(
        &self,
        filter: &ScholarshipFilter,
        limit: usize,
    ) -> Result<Vec<Scholarship>, AppError> {
        Ok(self
            .scholarships
            .iter()
            .filter(|s| filter.matches(s))
            .take(limit)
            .cloned()
            .collect())
    }
}
