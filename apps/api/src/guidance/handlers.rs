//! Axum route handlers for the cached AI guidance endpoints.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppQuery;
use crate::guidance::cache::{read_or_generate, CacheDirective, GuidanceKind, RefreshQuery};
use crate::models::guidance::{Analysis, Cached, Portfolio, Roadmap};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub analysis: Analysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub portfolio: Portfolio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapResponse {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub roadmap: Roadmap,
}

async fn read<K: GuidanceKind>(
    state: &AppState,
    auth: &AuthUser,
    directive: CacheDirective,
) -> Result<Cached<K>, AppError> {
    read_or_generate::<K>(
        state.users.as_ref(),
        state.llm.as_deref(),
        auth.user_id,
        directive,
    )
    .await
}

/// GET /ai/analyze
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<RefreshQuery>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let cached = read::<Analysis>(&state, &auth, query.directive()).await?;
    Ok(Json(AnalysisResponse {
        model: cached.model,
        created_at: cached.created_at,
        analysis: cached.data,
    }))
}

/// POST /ai/analyze
///
/// Always regenerates.
pub async fn handle_run_analysis(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AnalysisResponse>, AppError> {
    let cached = read::<Analysis>(&state, &auth, CacheDirective::Refresh).await?;
    Ok(Json(AnalysisResponse {
        model: cached.model,
        created_at: cached.created_at,
        analysis: cached.data,
    }))
}

/// GET /ai/portfolio
pub async fn handle_portfolio(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<RefreshQuery>,
) -> Result<Json<PortfolioResponse>, AppError> {
    let cached = read::<Portfolio>(&state, &auth, query.directive()).await?;
    Ok(Json(PortfolioResponse {
        model: cached.model,
        created_at: cached.created_at,
        portfolio: cached.data,
    }))
}

/// GET /ai/career-roadmap
pub async fn handle_roadmap(
    State(state): State<AppState>,
    auth: AuthUser,
    AppQuery(query): AppQuery<RefreshQuery>,
) -> Result<Json<RoadmapResponse>, AppError> {
    let cached = read::<Roadmap>(&state, &auth, query.directive()).await?;
    Ok(Json(RoadmapResponse {
        model: cached.model,
        created_at: cached.created_at,
        roadmap: cached.data,
    }))
}
