//! Enforced output contracts for generated guidance.
//!
//! These bounds are what a model response must satisfy to be cached. The
//! prompts ask for narrower ranges; those are hints only.

use crate::models::guidance::{Analysis, Portfolio, Roadmap, RoadmapStage};
use crate::validation::{FieldIssue, Issues};

pub const ANALYSIS_RECOMMENDATIONS: (usize, usize) = (3, 10);
pub const PORTFOLIO_SKILLS: (usize, usize) = (3, 12);
pub const PORTFOLIO_FOCUS_AREAS: (usize, usize) = (3, 12);
pub const PORTFOLIO_PROJECTS: (usize, usize) = (2, 10);
pub const ROADMAP_STAGES: (usize, usize) = (3, 8);
pub const STAGE_LIST_ITEMS: (usize, usize) = (1, 10);

pub trait OutputSchema {
    /// Every constraint violation, empty when the value is acceptable.
    fn violations(&self) -> Vec<FieldIssue>;
}

impl OutputSchema for Analysis {
    fn violations(&self) -> Vec<FieldIssue> {
        let mut issues = Issues::new();
        issues.require_text("primaryDomain", &self.primary_domain);
        issues.require_text("summary", &self.summary);

        let (min, max) = ANALYSIS_RECOMMENDATIONS;
        let count = self.recommendations.len();
        if count < min || count > max {
            issues.push(
                "recommendations",
                format!("must contain between {min} and {max} items (got {count})"),
            );
        }
        for (i, rec) in self.recommendations.iter().enumerate() {
            issues.require_text(&format!("recommendations[{i}].course"), &rec.course);
            issues.require_text(&format!("recommendations[{i}].reason"), &rec.reason);
            if !(0.0..=1.0).contains(&rec.confidence) {
                issues.push(
                    format!("recommendations[{i}].confidence"),
                    "must be between 0 and 1",
                );
            }
        }
        issues.into_vec()
    }
}

impl OutputSchema for Portfolio {
    fn violations(&self) -> Vec<FieldIssue> {
        let mut issues = Issues::new();
        issues.require_text("strengthSummary", &self.strength_summary);
        let (min, max) = PORTFOLIO_SKILLS;
        issues.require_text_list("skills", &self.skills, min, max);
        let (min, max) = PORTFOLIO_FOCUS_AREAS;
        issues.require_text_list("focusAreas", &self.focus_areas, min, max);
        let (min, max) = PORTFOLIO_PROJECTS;
        issues.require_text_list("projects", &self.projects, min, max);
        issues.into_vec()
    }
}

impl OutputSchema for RoadmapStage {
    fn violations(&self) -> Vec<FieldIssue> {
        let mut issues = Issues::new();
        issues.require_text("title", &self.title);
        issues.require_text("duration", &self.duration);
        let (min, max) = STAGE_LIST_ITEMS;
        for (field, values) in [
            ("skills", &self.skills),
            ("courses", &self.courses),
            ("projects", &self.projects),
            ("certifications", &self.certifications),
            ("milestones", &self.milestones),
        ] {
            issues.require_text_list(field, values, min, max);
        }
        issues.into_vec()
    }
}

impl OutputSchema for Roadmap {
    fn violations(&self) -> Vec<FieldIssue> {
        let mut issues = Issues::new();
        issues.require_text("primaryDomain", &self.primary_domain);
        let (min, max) = ROADMAP_STAGES;
        let count = self.stages.len();
        if count < min || count > max {
            issues.push(
                "stages",
                format!("must contain between {min} and {max} items (got {count})"),
            );
        }
        for (i, stage) in self.stages.iter().enumerate() {
            issues.extend_nested(&format!("stages[{i}]"), stage.violations());
        }
        issues.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guidance::CourseRecommendation;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item {i}")).collect()
    }

    fn portfolio(skills: usize) -> Portfolio {
        Portfolio {
            strength_summary: "Analytical and curious".into(),
            skills: words(skills),
            focus_areas: words(4),
            projects: words(3),
        }
    }

    fn stage() -> RoadmapStage {
        RoadmapStage {
            title: "Foundations".into(),
            duration: "0-6 months".into(),
            skills: words(2),
            courses: words(1),
            projects: words(1),
            certifications: words(1),
            milestones: words(2),
        }
    }

    #[test]
    fn test_portfolio_skill_bounds_are_strict_schema_bounds() {
        assert!(!portfolio(2).violations().is_empty());
        assert!(portfolio(3).violations().is_empty());
        assert!(portfolio(12).violations().is_empty());
        assert!(!portfolio(13).violations().is_empty());
    }

    #[test]
    fn test_portfolio_blank_summary() {
        let mut p = portfolio(5);
        p.strength_summary = "  ".into();
        let issues = p.violations();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "strengthSummary");
    }

    #[test]
    fn test_roadmap_stage_bounds_and_nested_paths() {
        let mut roadmap = Roadmap {
            primary_domain: "Engineering".into(),
            stages: vec![stage(), stage()],
        };
        let issues = roadmap.violations();
        assert_eq!(issues[0].field, "stages");

        roadmap.stages.push(stage());
        assert!(roadmap.violations().is_empty());

        roadmap.stages[1].certifications.clear();
        let issues = roadmap.violations();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "stages[1].certifications");

        roadmap.stages = (0..9).map(|_| stage()).collect();
        assert_eq!(roadmap.violations()[0].field, "stages");
    }

    #[test]
    fn test_analysis_confidence_range() {
        let rec = |confidence| CourseRecommendation {
            course: "B.Sc Physics".into(),
            confidence,
            reason: "Strong numeric reasoning".into(),
        };
        let mut analysis = Analysis {
            primary_domain: "Science".into(),
            summary: "Likes experiments".into(),
            recommendations: vec![rec(0.9), rec(0.5), rec(0.0)],
        };
        assert!(analysis.violations().is_empty());

        analysis.recommendations[1].confidence = 1.5;
        let issues = analysis.violations();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "recommendations[1].confidence");
    }
}
