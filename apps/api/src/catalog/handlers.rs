use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::catalog::filters::{JobRoleFilter, ScholarshipFilter};
use crate::catalog::{JOB_ROLE_LIMIT, SCHOLARSHIP_LIMIT};
use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::models::catalog::{JobRole, Scholarship};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct JobRoleQuery {
    pub domain: Option<String>,
    pub course: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRolesResponse {
    pub domain: Option<String>,
    pub count: usize,
    pub job_roles: Vec<JobRole>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipQuery {
    pub course: Option<String>,
    pub category: Option<String>,
    pub academic_level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScholarshipsResponse {
    pub filters: ScholarshipFilter,
    pub count: usize,
    pub scholarships: Vec<Scholarship>,
}

/// GET /ai/job-roles
///
/// Explicit `domain`/`course` take priority; the cached analysis fills the gaps.
pub async fn handle_job_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<JobRoleQuery>,
) -> Result<Json<JobRolesResponse>, AppError> {
    let user = state.users.get_by_id(auth.user_id).await?;
    let analysis = user.ai.analysis.as_ref().map(|c| &c.data);

    let filter = JobRoleFilter::resolve(
        query.domain.as_deref(),
        query.course.as_deref(),
        analysis,
    )?;
    let job_roles = state.catalog.find_job_roles(&filter, JOB_ROLE_LIMIT).await?;

    info!(
        "User {} job roles: domain={:?} tags={} matched={}",
        user.id,
        filter.domain,
        filter.course_tags.len(),
        job_roles.len()
    );

    Ok(Json(JobRolesResponse {
        domain: filter.domain,
        count: job_roles.len(),
        job_roles,
    }))
}

/// GET /scholarships
pub async fn handle_scholarships(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<ScholarshipQuery>,
) -> Result<Json<ScholarshipsResponse>, AppError> {
    let user = state.users.get_by_id(auth.user_id).await?;

    let filter = ScholarshipFilter::resolve(
        query.course.as_deref(),
        query.category.as_deref(),
        query.academic_level.as_deref(),
        user.ai.analysis.as_ref().map(|c| &c.data),
        user.profile.as_ref(),
    )?;
    let scholarships = state
        .catalog
        .find_scholarships(&filter, SCHOLARSHIP_LIMIT)
        .await?;

    info!(
        "User {} scholarships: level={} matched={}",
        user.id,
        filter.academic_level,
        scholarships.len()
    );

    Ok(Json(ScholarshipsResponse {
        filters: filter,
        count: scholarships.len(),
        scholarships,
    }))
}
