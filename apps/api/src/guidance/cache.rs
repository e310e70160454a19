//! Recommendation cache: per (user, slot), serve the stored result unless the
//! caller asks for a refresh, otherwise pass the prerequisite gates, generate
//! once, and overwrite the slot. There is no time-based expiry.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::guidance::answers::build_answer_context;
use crate::guidance::gateway::{
    ensure_configured, generate_analysis, generate_portfolio, generate_roadmap, Generated,
};
use crate::llm_client::CompletionProvider;
use crate::models::guidance::{
    AiBundle, Analysis, BundleEntry, BundleSlot, Cached, Portfolio, Roadmap,
};
use crate::models::profile::Profile;
use crate::models::user::User;
use crate::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    /// Serve the stored result when there is one.
    UseCached,
    /// Regenerate and overwrite regardless of what is stored.
    Refresh,
}

/// `?refresh=1` (or `true`) on the AI endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshQuery {
    pub refresh: Option<String>,
}

impl RefreshQuery {
    pub fn directive(&self) -> CacheDirective {
        match self.refresh.as_deref().map(str::trim) {
            Some("1") | Some("true") => CacheDirective::Refresh,
            _ => CacheDirective::UseCached,
        }
    }
}

/// Inputs that passed the stored-data gates.
pub struct GenerationInputs<'a> {
    pub profile: &'a Profile,
    pub answer_context: String,
    pub analysis: Option<&'a Analysis>,
}

impl<'a> GenerationInputs<'a> {
    /// Gates in order: profile → psychometric answers → analysis (when required).
    pub fn gather(user: &'a User, needs_analysis: bool) -> Result<Self, AppError> {
        let profile = user.profile.as_ref().ok_or_else(|| {
            AppError::PrerequisiteMissing(
                "Profile not found. Save your profile first (POST /user/profile).".to_string(),
            )
        })?;

        let psychometric = user.psychometric.as_ref().ok_or_else(|| {
            AppError::PrerequisiteMissing(
                "Psychometric answers not found. Submit them first (POST /user/psychometric)."
                    .to_string(),
            )
        })?;

        let analysis = user.ai.analysis.as_ref().map(|c| &c.data);
        if needs_analysis && analysis.is_none() {
            return Err(missing_analysis());
        }

        Ok(GenerationInputs {
            profile,
            answer_context: build_answer_context(&psychometric.answers),
            analysis,
        })
    }

    fn require_analysis(&self) -> Result<&'a Analysis, AppError> {
        self.analysis.ok_or_else(missing_analysis)
    }
}

fn missing_analysis() -> AppError {
    AppError::PrerequisiteMissing(
        "Analysis not found. Run the analysis first (GET /ai/analyze).".to_string(),
    )
}

/// One cacheable kind of generated guidance.
#[async_trait]
pub trait GuidanceKind: Sized + Clone + Send + Sync + 'static {
    const SLOT: BundleSlot;
    const NEEDS_ANALYSIS: bool;

    fn cached(bundle: &AiBundle) -> Option<&Cached<Self>>;

    fn into_entry(cached: Cached<Self>) -> BundleEntry;

    async fn generate(
        provider: &dyn CompletionProvider,
        inputs: &GenerationInputs<'_>,
    ) -> Result<Generated<Self>, AppError>;
}

#[async_trait]
impl GuidanceKind for Analysis {
    const SLOT: BundleSlot = BundleSlot::Analysis;
    const NEEDS_ANALYSIS: bool = false;

    fn cached(bundle: &AiBundle) -> Option<&Cached<Self>> {
        bundle.analysis.as_ref()
    }

    fn into_entry(cached: Cached<Self>) -> BundleEntry {
        BundleEntry::Analysis(cached)
    }

    async fn generate(
        provider: &dyn CompletionProvider,
        inputs: &GenerationInputs<'_>,
    ) -> Result<Generated<Self>, AppError> {
        Ok(generate_analysis(provider, inputs.profile, &inputs.answer_context).await?)
    }
}

#[async_trait]
impl GuidanceKind for Portfolio {
    const SLOT: BundleSlot = BundleSlot::Portfolio;
    const NEEDS_ANALYSIS: bool = true;

    fn cached(bundle: &AiBundle) -> Option<&Cached<Self>> {
        bundle.portfolio.as_ref()
    }

    fn into_entry(cached: Cached<Self>) -> BundleEntry {
        BundleEntry::Portfolio(cached)
    }

    async fn generate(
        provider: &dyn CompletionProvider,
        inputs: &GenerationInputs<'_>,
    ) -> Result<Generated<Self>, AppError> {
        let analysis = inputs.require_analysis()?;
        Ok(generate_portfolio(provider, inputs.profile, &inputs.answer_context, analysis).await?)
    }
}

#[async_trait]
impl GuidanceKind for Roadmap {
    const SLOT: BundleSlot = BundleSlot::Roadmap;
    const NEEDS_ANALYSIS: bool = true;

    fn cached(bundle: &AiBundle) -> Option<&Cached<Self>> {
        bundle.roadmap.as_ref()
    }

    fn into_entry(cached: Cached<Self>) -> BundleEntry {
        BundleEntry::Roadmap(cached)
    }

    async fn generate(
        provider: &dyn CompletionProvider,
        inputs: &GenerationInputs<'_>,
    ) -> Result<Generated<Self>, AppError> {
        let analysis = inputs.require_analysis()?;
        Ok(generate_roadmap(provider, inputs.profile, &inputs.answer_context, analysis).await?)
    }
}

/// Reads slot `K` for `user_id` under `directive`, generating on a miss or refresh.
///
/// Gates: profile → psychometric → analysis (Portfolio/Roadmap) → provider
/// configured. Only a validated result is written back. Concurrent refreshes
/// of the same slot are last-write-wins.
pub async fn read_or_generate<K: GuidanceKind>(
    users: &dyn UserStore,
    provider: Option<&dyn CompletionProvider>,
    user_id: Uuid,
    directive: CacheDirective,
) -> Result<Cached<K>, AppError> {
    let user = users.get_by_id(user_id).await?;

    if directive == CacheDirective::UseCached {
        if let Some(cached) = K::cached(&user.ai) {
            return Ok(cached.clone());
        }
    }

    let inputs = GenerationInputs::gather(&user, K::NEEDS_ANALYSIS)?;
    let provider = ensure_configured(provider)?;

    info!("Generating {} for user {} ({:?})", K::SLOT, user_id, directive);
    let generated = K::generate(provider, &inputs).await?;

    let cached = Cached {
        model: generated.model,
        created_at: Utc::now(),
        data: generated.value,
    };
    users
        .update_ai_bundle(user_id, K::into_entry(cached.clone()))
        .await?;

    Ok(cached)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::llm_client::scripted::{Reply, ScriptedProvider};
    use crate::models::profile::EducationLevel;
    use crate::models::psychometric::PsychometricSubmission;
    use crate::store::memory::MemoryStore;

    const ANALYSIS_JSON: &str = r#"{
        "primaryDomain": "Engineering",
        "summary": "Enjoys building and fixing things.",
        "recommendations": [
            {"course": "Mechanical Engineering", "confidence": 0.86, "reason": "Hands-on"},
            {"course": "Civil Engineering", "confidence": 0.71, "reason": "Structures"},
            {"course": "Robotics", "confidence": 0.64, "reason": "Interest in robots"}
        ]
    }"#;

    const PORTFOLIO_JSON: &str = r#"{
        "strengthSummary": "Practical problem solver",
        "skills": ["CAD", "Physics", "Python", "Teamwork", "Sketching"],
        "focusAreas": ["Mechanics", "Materials", "Design", "Math"],
        "projects": ["Bridge model", "Line follower robot", "3D printed gears"]
    }"#;

    fn profile() -> Profile {
        Profile {
            full_name: "Asha Rao".into(),
            age: 19,
            education_level: EducationLevel::Undergraduate,
            interests: vec!["coding".into()],
        }
    }

    fn submission() -> PsychometricSubmission {
        PsychometricSubmission {
            answers: (1..=8)
                .map(|i| (format!("q{i}"), format!("a{i}")))
                .collect::<BTreeMap<_, _>>(),
            submitted_at: Utc::now(),
        }
    }

    async fn user_with(store: &MemoryStore, with_profile: bool, with_answers: bool) -> Uuid {
        let user = store.insert_user("a@x.com", "hash").await.unwrap();
        if with_profile {
            store.update_profile(user.id, &profile()).await.unwrap();
        }
        if with_answers {
            store.update_psychometric(user.id, &submission()).await.unwrap();
        }
        user.id
    }

    #[test]
    fn test_refresh_query_directive() {
        let q = |v: Option<&str>| RefreshQuery {
            refresh: v.map(String::from),
        };
        assert_eq!(q(None).directive(), CacheDirective::UseCached);
        assert_eq!(q(Some("0")).directive(), CacheDirective::UseCached);
        assert_eq!(q(Some("1")).directive(), CacheDirective::Refresh);
        assert_eq!(q(Some("true")).directive(), CacheDirective::Refresh);
    }

    #[tokio::test]
    async fn test_gate_order_profile_first() {
        let store = MemoryStore::default();
        let provider = ScriptedProvider::text(PORTFOLIO_JSON);

        let id = user_with(&store, false, true).await;
        let err = read_or_generate::<Portfolio>(&store, Some(&provider), id, CacheDirective::UseCached)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PrerequisiteMissing(msg) if msg.contains("/user/profile")));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_gate_psychometric_then_analysis() {
        let store = MemoryStore::default();
        let provider = ScriptedProvider::text(PORTFOLIO_JSON);

        let id = user_with(&store, true, false).await;
        let err = read_or_generate::<Portfolio>(&store, Some(&provider), id, CacheDirective::UseCached)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::PrerequisiteMissing(msg) if msg.contains("/user/psychometric"))
        );

        store.update_psychometric(id, &submission()).await.unwrap();
        let err = read_or_generate::<Roadmap>(&store, Some(&provider), id, CacheDirective::Refresh)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PrerequisiteMissing(msg) if msg.contains("/ai/analyze")));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_gate_comes_last() {
        let store = MemoryStore::default();
        let id = user_with(&store, true, true).await;
        let err = read_or_generate::<Analysis>(&store, None, id, CacheDirective::UseCached)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_cached_read_skips_provider() {
        let store = MemoryStore::default();
        let id = user_with(&store, true, true).await;
        let provider = ScriptedProvider::new(vec![
            Reply::Text(ANALYSIS_JSON.to_string()),
            Reply::Text(PORTFOLIO_JSON.to_string()),
        ]);

        read_or_generate::<Analysis>(&store, Some(&provider), id, CacheDirective::UseCached)
            .await
            .unwrap();
        let first = read_or_generate::<Portfolio>(&store, Some(&provider), id, CacheDirective::UseCached)
            .await
            .unwrap();
        let second =
            read_or_generate::<Portfolio>(&store, Some(&provider), id, CacheDirective::UseCached)
                .await
                .unwrap();

        assert_eq!(provider.calls(), 2);
        assert_eq!(first, second);
        assert_eq!(first.data.skills.len(), 5);
    }

    #[tokio::test]
    async fn test_refresh_regenerates_and_overwrites() {
        let store = MemoryStore::default();
        let id = user_with(&store, true, true).await;
        let provider = ScriptedProvider::text(ANALYSIS_JSON);

        let first = read_or_generate::<Analysis>(&store, Some(&provider), id, CacheDirective::Refresh)
            .await
            .unwrap();
        let second =
            read_or_generate::<Analysis>(&store, Some(&provider), id, CacheDirective::Refresh)
                .await
                .unwrap();
        assert_eq!(provider.calls(), 2);
        assert!(second.created_at >= first.created_at);

        let stored = store.get_by_id(id).await.unwrap();
        assert_eq!(stored.ai.analysis.unwrap(), second);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_previous_value() {
        let store = MemoryStore::default();
        let id = user_with(&store, true, true).await;
        let provider = ScriptedProvider::new(vec![
            Reply::Text(ANALYSIS_JSON.to_string()),
            Reply::Text("not json".to_string()),
        ]);

        let original =
            read_or_generate::<Analysis>(&store, Some(&provider), id, CacheDirective::UseCached)
                .await
                .unwrap();
        let err = read_or_generate::<Analysis>(&store, Some(&provider), id, CacheDirective::Refresh)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { .. }));

        let stored = store.get_by_id(id).await.unwrap();
        assert_eq!(stored.ai.analysis.unwrap(), original);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = MemoryStore::default();
        let provider = ScriptedProvider::text(ANALYSIS_JSON);
        let err = read_or_generate::<Analysis>(
            &store,
            Some(&provider),
            Uuid::new_v4(),
            CacheDirective::UseCached,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
