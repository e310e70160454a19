use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::catalog::filters::{JobRoleFilter, ScholarshipFilter};
use crate::errors::AppError;
use crate::models::catalog::{JobRole, Scholarship};
use crate::models::guidance::{BundleEntry, BundleSlot};
use crate::models::profile::Profile;
use crate::models::psychometric::PsychometricSubmission;
use crate::models::user::{User, UserRow};
use crate::store::{user_not_found, CatalogStore, UserStore};

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at, \
    profile, psychometric, ai_analysis, ai_portfolio, ai_roadmap";

/// PostgreSQL-backed store. Sub-documents live in JSONB columns on `users`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bundle_column(slot: BundleSlot) -> &'static str {
    match slot {
        BundleSlot::Analysis => "ai_analysis",
        BundleSlot::Portfolio => "ai_portfolio",
        BundleSlot::Roadmap => "ai_roadmap",
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::DuplicateEmail,
            other => AppError::Database(other),
        })?;

        info!("Created user {}", row.id);
        Ok(row.into())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| user_not_found(id))
    }

    async fn update_profile(&self, id: Uuid, profile: &Profile) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE users SET profile = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(profile))
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn update_psychometric(
        &self,
        id: Uuid,
        submission: &PsychometricSubmission,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE users SET psychometric = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(submission))
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }

    async fn update_ai_bundle(&self, id: Uuid, entry: BundleEntry) -> Result<(), AppError> {
        let column = bundle_column(entry.slot());
        let value = entry
            .to_json()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize {column}: {e}")))?;

        // Column name comes from a fixed match above, never from input.
        let result = sqlx::query(&format!(
            "UPDATE users SET {column} = $2, updated_at = now() WHERE id = $1"
        ))
        .bind(id)
        .bind(value)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn find_job_roles(
        &self,
        filter: &JobRoleFilter,
        limit: usize,
    ) -> Result<Vec<JobRole>, AppError> {
        let roles = sqlx::query_as::<_, JobRole>(
            r#"
            SELECT id, title, domain, salary_min, salary_max, required_skills,
                   demand_level, course_tags
            FROM job_roles
            WHERE ($1::text IS NULL OR domain = $1)
              AND (cardinality($2::text[]) = 0
                   OR EXISTS (SELECT 1 FROM unnest(course_tags) AS tag
                              WHERE lower(tag) = ANY($2)))
            LIMIT $3
            "#,
        )
        .bind(filter.domain.as_deref())
        .bind(&filter.course_tags)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn find_scholarships(
        &self,
        filter: &ScholarshipFilter,
        limit: usize,
    ) -> Result<Vec<Scholarship>, AppError> {
        let scholarships = sqlx::query_as::<_, Scholarship>(
            r#"
            SELECT id, name, url, course_tags, category, academic_level, deadline,
                   amount_min, amount_max, eligibility
            FROM scholarships
            WHERE academic_level = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL
                   OR EXISTS (SELECT 1 FROM unnest(course_tags) AS tag
                              WHERE lower(tag) = $3))
            LIMIT $4
            "#,
        )
        .bind(&filter.academic_level)
        .bind(filter.category.as_deref())
        .bind(filter.course.as_deref())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(scholarships)
    }
}
