// Guidance LLM prompt templates.
// All prompts for the guidance module are defined here.

use crate::models::guidance::Analysis;
use crate::models::profile::Profile;

pub const GUIDANCE_SYSTEM: &str = "\
You are an experienced career counsellor for school and university students. \
Base every recommendation on the student's profile and questionnaire answers. \
Be concrete and realistic for the student's education level. \
You MUST respond with a single valid JSON object only — no markdown fences, no explanations.";

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyse this student and recommend courses of study.

STUDENT PROFILE:
{profile}

PSYCHOMETRIC ANSWERS:
{answers}

OUTPUT SCHEMA (return exactly this structure):
{
  "primaryDomain": "string (broad field, e.g. Engineering, Medicine, Design, Commerce)",
  "summary": "string (2-3 sentences on the student's aptitude)",
  "recommendations": [
    {"course": "string", "confidence": number between 0 and 1, "reason": "string"}
  ]
}

RULES:
1. Give 5 recommendations, best match first.
2. Course names should be short and conventional (e.g. "Mechanical Engineering").
3. Return ONLY the JSON object — nothing else."#;

pub const PORTFOLIO_PROMPT_TEMPLATE: &str = r#"Build a skills portfolio for this student.

STUDENT PROFILE:
{profile}

PSYCHOMETRIC ANSWERS:
{answers}

CURRENT ANALYSIS:
{analysis}

OUTPUT SCHEMA (return exactly this structure):
{
  "strengthSummary": "string (what this student is already good at)",
  "skills": ["string"],
  "focusAreas": ["string"],
  "projects": ["string (one-line project idea)"]
}

RULES:
1. 5-8 skills to build, 4-8 focus areas, 3-6 project ideas.
2. Every entry must be a short, non-empty phrase.
3. Return ONLY the JSON object — nothing else."#;

pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Plan a career roadmap for this student.

STUDENT PROFILE:
{profile}

PSYCHOMETRIC ANSWERS:
{answers}

CURRENT ANALYSIS:
{analysis}

OUTPUT SCHEMA (return exactly this structure):
{
  "primaryDomain": "string",
  "stages": [
    {
      "title": "string",
      "duration": "string (e.g. '0-6 months')",
      "skills": ["string"],
      "courses": ["string"],
      "projects": ["string"],
      "certifications": ["string"],
      "milestones": ["string"]
    }
  ]
}

RULES:
1. 4-6 stages in chronological order, starting from the student's current education level.
2. Each list holds 1-5 short, non-empty entries.
3. primaryDomain must match the analysis.
4. Return ONLY the JSON object — nothing else."#;

fn render_profile(profile: &Profile) -> String {
    format!(
        "Name: {}\nAge: {}\nEducation level: {}\nInterests: {}",
        profile.full_name,
        profile.age,
        profile.education_level,
        profile.interests.join(", ")
    )
}

fn render_analysis(analysis: &Analysis) -> String {
    let courses = analysis
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} ({:.2}) — {}", i + 1, r.course, r.confidence, r.reason))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Primary domain: {}\nSummary: {}\nRecommended courses:\n{}",
        analysis.primary_domain, analysis.summary, courses
    )
}

/// Substitutes each `{name}` placeholder in a single pass, so placeholder-like
/// text inside substituted values is left as is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix(*key)?
                .strip_prefix('}')
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn analysis_prompt(profile: &Profile, answer_context: &str) -> String {
    fill(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("profile", render_profile(profile).as_str()),
            ("answers", answer_context),
        ],
    )
}

pub fn portfolio_prompt(profile: &Profile, answer_context: &str, analysis: &Analysis) -> String {
    fill(
        PORTFOLIO_PROMPT_TEMPLATE,
        &[
            ("profile", render_profile(profile).as_str()),
            ("answers", answer_context),
            ("analysis", render_analysis(analysis).as_str()),
        ],
    )
}

pub fn roadmap_prompt(profile: &Profile, answer_context: &str, analysis: &Analysis) -> String {
    fill(
        ROADMAP_PROMPT_TEMPLATE,
        &[
            ("profile", render_profile(profile).as_str()),
            ("answers", answer_context),
            ("analysis", render_analysis(analysis).as_str()),
        ],
    )
}
