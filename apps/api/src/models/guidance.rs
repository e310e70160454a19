//! AI-generated guidance results and the per-user bundle they are cached in.
//!
//! String and list fields default when absent so that an incomplete model
//! response reaches schema validation and is reported field by field.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecommendation {
    #[serde(default)]
    pub course: String,
    /// 0.0 – 1.0
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default)]
    pub primary_domain: String,
    #[serde(default)]
    pub summary: String,
    /// Ranked, best match first.
    #[serde(default)]
    pub recommendations: Vec<CourseRecommendation>,
}

impl Analysis {
    pub fn top_course(&self) -> Option<&str> {
        self.recommendations.first().map(|r| r.course.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub strength_summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    #[serde(default)]
    pub primary_domain: String,
    #[serde(default)]
    pub stages: Vec<RoadmapStage>,
}

/// A generated result together with when and by which model it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cached<T> {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleSlot {
    Analysis,
    Portfolio,
    Roadmap,
}

impl BundleSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleSlot::Analysis => "analysis",
            BundleSlot::Portfolio => "portfolio",
            BundleSlot::Roadmap => "roadmap",
        }
    }
}

impl fmt::Display for BundleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiBundle {
    pub analysis: Option<Cached<Analysis>>,
    pub portfolio: Option<Cached<Portfolio>>,
    pub roadmap: Option<Cached<Roadmap>>,
}

/// One slot's worth of data, as handed to the store for a full replace.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleEntry {
    Analysis(Cached<Analysis>),
    Portfolio(Cached<Portfolio>),
    Roadmap(Cached<Roadmap>),
}

impl BundleEntry {
    pub fn slot(&self) -> BundleSlot {
        match self {
            BundleEntry::Analysis(_) => BundleSlot::Analysis,
            BundleEntry::Portfolio(_) => BundleSlot::Portfolio,
            BundleEntry::Roadmap(_) => BundleSlot::Roadmap,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            BundleEntry::Analysis(c) => serde_json::to_value(c),
            BundleEntry::Portfolio(c) => serde_json::to_value(c),
            BundleEntry::Roadmap(c) => serde_json::to_value(c),
        }
    }

    pub fn apply_to(self, bundle: &mut AiBundle) {
        match self {
            BundleEntry::Analysis(c) => bundle.analysis = Some(c),
            BundleEntry::Portfolio(c) => bundle.portfolio = Some(c),
            BundleEntry::Roadmap(c) => bundle.roadmap = Some(c),
        }
    }
}
