//! Persistence ports.
//!
//! `AppState` carries `Arc<dyn UserStore>` and `Arc<dyn CatalogStore>`; the
//! PostgreSQL implementation is wired at startup, the in-memory one backs the
//! test suite.

use async_trait::async_trait;
use uuid::Uuid;

use crate::catalog::filters::{JobRoleFilter, ScholarshipFilter};
use crate::errors::AppError;
use crate::models::catalog::{JobRole, Scholarship};
use crate::models::guidance::BundleEntry;
use crate::models::profile::Profile;
use crate::models::psychometric::PsychometricSubmission;
use crate::models::user::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// User accounts and their embedded sub-documents.
///
/// Every `update_*` replaces one sub-document wholesale, touches `updated_at`,
/// and fails with `AppError::NotFound` when the id does not resolve.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` must already be normalized. Fails with `AppError::DuplicateEmail`.
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError>;

    async fn update_profile(&self, id: Uuid, profile: &Profile) -> Result<(), AppError>;

    async fn update_psychometric(
        &self,
        id: Uuid,
        submission: &PsychometricSubmission,
    ) -> Result<(), AppError>;

    async fn update_ai_bundle(&self, id: Uuid, entry: BundleEntry) -> Result<(), AppError>;
}

/// Read-only reference collections.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_job_roles(
        &self,
        filter: &JobRoleFilter,
        limit: usize,
    ) -> Result<Vec<JobRole>, AppError>;

    async fn find_scholarships(
        &self,
        filter: &ScholarshipFilter,
        limit: usize,
    ) -> Result<Vec<Scholarship>, AppError>;
}

pub(crate) fn user_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("User {id} not found"))
}
