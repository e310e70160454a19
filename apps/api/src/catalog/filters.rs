//! Filter resolution for the reference collections.
//!
//! A filter is resolved from explicit query parameters with the user's cached
//! analysis and profile as fallbacks. `matches` is the in-process rendition
//! of the SQL predicate used by the PostgreSQL store.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::catalog::{JobRole, Scholarship};
use crate::models::guidance::Analysis;
use crate::models::profile::Profile;

/// Course tags are compared trimmed and lower-cased.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Blank query parameters count as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRoleFilter {
    /// Exact match when present.
    pub domain: Option<String>,
    /// A role matches when any of its tags is in this set. Empty means no tag filter.
    pub course_tags: Vec<String>,
}

impl JobRoleFilter {
    pub fn resolve(
        domain: Option<&str>,
        course: Option<&str>,
        analysis: Option<&Analysis>,
    ) -> Result<Self, AppError> {
        let domain = non_blank(domain);
        let course = non_blank(course);

        if domain.is_none() && course.is_none() && analysis.is_none() {
            return Err(AppError::PrerequisiteMissing(
                "No analysis found. Run the analysis first (GET /ai/analyze) or pass a domain or course."
                    .to_string(),
            ));
        }

        let domain = domain.map(String::from).or_else(|| {
            analysis
                .map(|a| a.primary_domain.trim())
                .filter(|d| !d.is_empty())
                .map(String::from)
        });

        let mut course_tags: Vec<String> = Vec::new();
        let analysis_courses = analysis
            .into_iter()
            .flat_map(|a| a.recommendations.iter().map(|r| r.course.as_str()));
        for candidate in course.into_iter().chain(analysis_courses) {
            let tag = normalize_tag(candidate);
            if !tag.is_empty() && !course_tags.contains(&tag) {
                course_tags.push(tag);
            }
        }

        Ok(JobRoleFilter {
            domain,
            course_tags,
        })
    }

    pub fn matches(&self, role: &JobRole) -> bool {
        let domain_ok = self.domain.as_deref().map_or(true, |d| role.domain == d);
        let tags_ok = self.course_tags.is_empty()
            || role
                .course_tags
                .iter()
                .any(|tag| self.course_tags.contains(&tag.to_lowercase()));
        domain_ok && tags_ok
    }
}

/// Echoed back to the client as `filters` in the scholarships response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipFilter {
    pub academic_level: String,
    pub category: Option<String>,
    pub course: Option<String>,
}

impl ScholarshipFilter {
    pub fn resolve(
        course: Option<&str>,
        category: Option<&str>,
        academic_level: Option<&str>,
        analysis: Option<&Analysis>,
        profile: Option<&Profile>,
    ) -> Result<Self, AppError> {
        let academic_level = non_blank(academic_level)
            .map(String::from)
            .or_else(|| profile.map(|p| p.education_level.as_str().to_string()))
            .ok_or_else(|| {
                AppError::PrerequisiteMissing(
                    "No academic level known. Save your profile first (POST /user/profile) or pass academicLevel."
                        .to_string(),
                )
            })?;

        let course = non_blank(course)
            .or_else(|| analysis.and_then(Analysis::top_course))
            .map(normalize_tag)
            .filter(|c| !c.is_empty());

        Ok(ScholarshipFilter {
            academic_level,
            category: non_blank(category).map(String::from),
            course,
        })
    }

    pub fn matches(&self, scholarship: &Scholarship) -> bool {
        scholarship.academic_level == self.academic_level
            && self
                .category
                .as_deref()
                .map_or(true, |c| scholarship.category.as_deref() == Some(c))
            && self.course.as_deref().map_or(true, |course| {
                scholarship
                    .course_tags
                    .iter()
                    .any(|tag| tag.to_lowercase() == course)
            })
    }
}
