//! AI gateway: one provider call per generation, parsed and schema-checked.
//!
//! Failure order: not configured → empty response → malformed JSON →
//! schema violation. Transport/provider failures surface from the call itself.
//! Nothing is retried.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::guidance::prompts::{analysis_prompt, portfolio_prompt, roadmap_prompt, GUIDANCE_SYSTEM};
use crate::guidance::schema::OutputSchema;
use crate::llm_client::prompts::GUIDANCE_TEMPERATURE;
use crate::llm_client::{strip_json_fences, CompletionProvider, CompletionRequest, LlmError};
use crate::models::guidance::{Analysis, Portfolio, Roadmap};
use crate::models::profile::Profile;
use crate::validation::FieldIssue;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("AI provider is not configured")]
    NotConfigured,

    #[error("AI provider returned an empty response")]
    EmptyResponse,

    #[error("AI response was not valid JSON: {reason}")]
    MalformedJson { raw: String, reason: String },

    #[error("AI response failed schema validation ({} issues)", .0.len())]
    SchemaViolation(Vec<FieldIssue>),

    #[error("AI provider request failed: {0}")]
    Provider(#[from] LlmError),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        match err {
            GatewayError::NotConfigured => AppError::Configuration(
                "AI provider is not configured. Set ANTHROPIC_API_KEY.".to_string(),
            ),
            GatewayError::EmptyResponse | GatewayError::Provider(_) => AppError::Upstream {
                message,
                detail: None,
            },
            GatewayError::MalformedJson { raw, reason } => AppError::Upstream {
                message: "AI response was not valid JSON".to_string(),
                detail: Some(json!({ "raw": raw, "reason": reason })),
            },
            GatewayError::SchemaViolation(issues) => AppError::Upstream {
                message,
                detail: serde_json::to_value(issues).ok(),
            },
        }
    }
}

/// A validated result and the model that produced it.
#[derive(Debug, Clone)]
pub struct Generated<T> {
    pub value: T,
    pub model: String,
}

/// The configured provider, or `GatewayError::NotConfigured`.
pub fn ensure_configured(
    provider: Option<&dyn CompletionProvider>,
) -> Result<&dyn CompletionProvider, GatewayError> {
    provider.ok_or(GatewayError::NotConfigured)
}

/// Submits `prompt` once and returns the response as a validated `T`.
pub async fn generate<T>(
    provider: &dyn CompletionProvider,
    prompt: &str,
) -> Result<Generated<T>, GatewayError>
where
    T: DeserializeOwned + OutputSchema,
{
    let completion = provider
        .complete(CompletionRequest {
            system: GUIDANCE_SYSTEM,
            prompt,
            temperature: GUIDANCE_TEMPERATURE,
        })
        .await?;

    let raw = completion
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or(GatewayError::EmptyResponse)?;

    let value = parse_object(&raw)?;

    let parsed: T = serde_json::from_value(value).map_err(|e| {
        GatewayError::SchemaViolation(vec![FieldIssue {
            field: "$".to_string(),
            message: e.to_string(),
        }])
    })?;

    let issues = parsed.violations();
    if !issues.is_empty() {
        warn!("Model {} response failed schema: {:?}", completion.model, issues);
        return Err(GatewayError::SchemaViolation(issues));
    }

    info!("Model {} response accepted", completion.model);
    Ok(Generated {
        value: parsed,
        model: completion.model,
    })
}

fn parse_object(raw: &str) -> Result<Value, GatewayError> {
    let malformed = |reason: String| GatewayError::MalformedJson {
        raw: raw.to_string(),
        reason,
    };
    let value: Value =
        serde_json::from_str(strip_json_fences(raw)).map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("expected a single JSON object".to_string()));
    }
    Ok(value)
}

pub async fn generate_analysis(
    provider: &dyn CompletionProvider,
    profile: &Profile,
    answer_context: &str,
) -> Result<Generated<Analysis>, GatewayError> {
    generate(provider, &analysis_prompt(profile, answer_context)).await
}

pub async fn generate_portfolio(
    provider: &dyn CompletionProvider,
    profile: &Profile,
    answer_context: &str,
    analysis: &Analysis,
) -> Result<Generated<Portfolio>, GatewayError> {
    generate(provider, &portfolio_prompt(profile, answer_context, analysis)).await
}

pub async fn generate_roadmap(
    provider: &dyn CompletionProvider,
    profile: &Profile,
    answer_context: &str,
    analysis: &Analysis,
) -> Result<Generated<Roadmap>, GatewayError> {
    generate(provider, &roadmap_prompt(profile, answer_context, analysis)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::scripted::{Reply, ScriptedProvider, SCRIPTED_MODEL};

    const VALID_PORTFOLIO: &str = r#"{
        "strengthSummary": "Strong logical reasoning",
        "skills": ["Python", "Statistics", "Git", "SQL", "Writing"],
        "focusAreas": ["Data analysis", "Research", "Communication", "Math"],
        "projects": ["Weather dashboard", "Survey analysis", "Blog"]
    }"#;

    async fn portfolio_from(provider: &ScriptedProvider) -> Result<Generated<Portfolio>, GatewayError> {
        generate::<Portfolio>(provider, "prompt").await
    }

    #[test]
    fn test_not_configured_maps_to_configuration_error() {
        let err = ensure_configured(None).err().unwrap();
        assert!(matches!(err, GatewayError::NotConfigured));
        let app: AppError = err.into();
        assert_eq!(app.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_valid_response_is_accepted() {
        let provider = ScriptedProvider::text(VALID_PORTFOLIO);
        let generated = portfolio_from(&provider).await.unwrap();
        assert_eq!(generated.model, SCRIPTED_MODEL);
        assert_eq!(generated.value.skills.len(), 5);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_response_is_accepted() {
        let provider = ScriptedProvider::text(format!("```json\n{VALID_PORTFOLIO}\n```"));
        assert!(portfolio_from(&provider).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_response() {
        for reply in [Reply::NoContent, Reply::Text("   ".to_string())] {
            let provider = ScriptedProvider::new(vec![reply]);
            let err = portfolio_from(&provider).await.unwrap_err();
            assert!(matches!(err, GatewayError::EmptyResponse));
        }
    }

    #[tokio::test]
    async fn test_malformed_json_echoes_raw_content() {
        let provider = ScriptedProvider::text("Sure! Here is your portfolio.");
        let err = portfolio_from(&provider).await.unwrap_err();
        let GatewayError::MalformedJson { raw, .. } = &err else {
            panic!("expected MalformedJson, got {err:?}");
        };
        assert_eq!(raw, "Sure! Here is your portfolio.");

        let app: AppError = err.into();
        let AppError::Upstream { detail, .. } = app else {
            panic!("expected Upstream");
        };
        assert_eq!(detail.unwrap()["raw"], "Sure! Here is your portfolio.");
    }

    #[tokio::test]
    async fn test_json_array_is_malformed() {
        let provider = ScriptedProvider::text("[1, 2, 3]");
        let err = portfolio_from(&provider).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedJson { .. }));
    }

    #[tokio::test]
    async fn test_schema_violation_reports_fields() {
        let provider = ScriptedProvider::text(
            r#"{"strengthSummary": "ok", "skills": ["a", "b"], "focusAreas": ["x", "y", "z"], "projects": ["p", "q"]}"#,
        );
        let err = portfolio_from(&provider).await.unwrap_err();
        let GatewayError::SchemaViolation(issues) = err else {
            panic!("expected SchemaViolation");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "skills");
    }

    #[tokio::test]
    async fn test_wrong_types_are_schema_violations() {
        let provider = ScriptedProvider::text(r#"{"strengthSummary": 42}"#);
        let err = portfolio_from(&provider).await.unwrap_err();
        assert!(matches!(err, GatewayError::SchemaViolation(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway_without_retry() {
        let provider = ScriptedProvider::new(vec![Reply::Fail("overloaded".to_string())]);
        let err = portfolio_from(&provider).await.unwrap_err();
        assert!(err.to_string().contains("overloaded"));
        assert_eq!(provider.calls(), 1);

        let app: AppError = err.into();
        assert_eq!(app.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_analysis_prompt_carries_profile_and_answers() {
        let provider = ScriptedProvider::text(
            r#"{"primaryDomain": "Science", "summary": "Curious",
                "recommendations": [
                    {"course": "Physics", "confidence": 0.9, "reason": "Experiments"},
                    {"course": "Chemistry", "confidence": 0.7, "reason": "Lab work"},
                    {"course": "Biology", "confidence": 0.5, "reason": "Nature"}
                ]}"#,
        );
        let profile = Profile {
            full_name: "Ravi Menon".into(),
            age: 16,
            education_level: crate::models::profile::EducationLevel::HighSchool,
            interests: vec!["astronomy".into()],
        };

        let generated = generate_analysis(&provider, &profile, "Q: q1\nA: stars")
            .await
            .unwrap();
        assert_eq!(generated.value.top_course(), Some("Physics"));

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Name: Ravi Menon"));
        assert!(prompts[0].contains("Education level: High School"));
        assert!(prompts[0].contains("Q: q1\nA: stars"));
    }
}
