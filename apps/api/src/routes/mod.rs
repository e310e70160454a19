pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{auth, catalog, guidance, profile};


pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/auth/signup", post(auth::handlers::handle_signup))
        .route("/auth/login", post(auth::handlers::handle_login))
        // Stored user data
        .route("/me", get(profile::handlers::handle_me))
        .route("/user/profile", post(profile::handlers::handle_save_profile))
        .route(
            "/user/psychometric",
            post(profile::handlers::handle_save_psychometric),
        )
        // AI guidance (cached per user)
        .route(
            "/ai/analyze",
            get(guidance::handlers::handle_get_analysis)
                .post(guidance::handlers::handle_run_analysis),
        )
        .route("/ai/portfolio", get(guidance::handlers::handle_portfolio))
        .route("/ai/career-roadmap", get(guidance::handlers::handle_roadmap))
        // Reference collections
        .route("/ai/job-roles", get(catalog::handlers::handle_job_roles))
        .route("/scholarships", get(catalog::handlers::handle_scholarships))
        .with_state(state)
}
