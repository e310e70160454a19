use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::accounts::{authenticate, create_account, Credentials, CredentialsInput};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::{User, UserSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
    Ok(AuthResponse {
        token: state.tokens.issue(user.id, &user.email)?,
        user: user.summary(),
    })
}

/// POST /auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<CredentialsInput>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let credentials = Credentials::try_from_input(input).map_err(AppError::validation)?;
    let user = create_account(state.users.as_ref(), credentials, state.config.bcrypt_cost).await?;
    info!("Signup complete for user {}", user.id);
    Ok((StatusCode::CREATED, Json(auth_response(&state, &user)?)))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(input): AppJson<CredentialsInput>,
) -> Result<Json<AuthResponse>, AppError> {
    let credentials = Credentials::try_from_input(input).map_err(AppError::validation)?;
    let user = authenticate(state.users.as_ref(), credentials).await?;
    Ok(Json(auth_response(&state, &user)?))
}
