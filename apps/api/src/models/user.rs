use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::models::guidance::{AiBundle, Analysis, Cached, Portfolio, Roadmap};
use crate::models::profile::Profile;
use crate::models::psychometric::PsychometricSubmission;

/// A user account with its embedded sub-documents.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Option<Profile>,
    pub psychometric: Option<PsychometricSubmission>,
    pub ai: AiBundle,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
}

/// Row shape of the `users` table; JSONB columns hold the sub-documents.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Option<Json<Profile>>,
    pub psychometric: Option<Json<PsychometricSubmission>>,
    pub ai_analysis: Option<Json<Cached<Analysis>>>,
    pub ai_portfolio: Option<Json<Cached<Portfolio>>>,
    pub ai_roadmap: Option<Json<Cached<Roadmap>>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
            profile: row.profile.map(|Json(p)| p),
            psychometric: row.psychometric.map(|Json(p)| p),
            ai: AiBundle {
                analysis: row.ai_analysis.map(|Json(a)| a),
                portfolio: row.ai_portfolio.map(|Json(p)| p),
                roadmap: row.ai_roadmap.map(|Json(r)| r),
            },
        }
    }
}
