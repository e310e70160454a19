use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::llm_client::CompletionProvider;
use crate::store::{CatalogStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn CatalogStore>,
    /// `None` when no provider key is configured; AI endpoints then fail with 500.
    pub llm: Option<Arc<dyn CompletionProvider>>,
    pub tokens: TokenKeys,
    pub config: Config,
}
