use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::profile::{Profile, ProfileInput};
use crate::models::psychometric::{PsychometricInput, PsychometricSubmission};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychometricStatus {
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MeUser {
    pub id: Uuid,
    pub email: String,
    pub profile: Option<Profile>,
    pub psychometric: PsychometricStatus,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: MeUser,
}

/// GET /me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = state.users.get_by_id(auth.user_id).await?;
    Ok(Json(MeResponse {
        user: MeUser {
            id: user.id,
            email: user.email,
            profile: user.profile,
            psychometric: PsychometricStatus {
                submitted_at: user.psychometric.map(|p| p.submitted_at),
            },
        },
    }))
}

/// POST /user/profile
///
/// Replaces the stored profile wholesale.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<ProfileInput>,
) -> Result<Json<Value>, AppError> {
    let profile = Profile::try_from_input(input).map_err(AppError::validation)?;
    state.users.update_profile(auth.user_id, &profile).await?;
    info!("Saved profile for user {}", auth.user_id);
    Ok(Json(json!({ "ok": true })))
}

/// POST /user/psychometric
///
/// Replaces the stored answers wholesale and stamps `submittedAt`.
pub async fn handle_save_psychometric(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(input): AppJson<PsychometricInput>,
) -> Result<Json<Value>, AppError> {
    let submission = PsychometricSubmission::try_from_input(input, Utc::now())
        .map_err(AppError::validation)?;
    state
        .users
        .update_psychometric(auth.user_id, &submission)
        .await?;
    info!(
        "Saved {} psychometric answers for user {}",
        submission.answers.len(),
        auth.user_id
    );
    Ok(Json(json!({ "ok": true })))
}
