use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Error)]
#[error("unknown demand level '{0}'")]
pub struct UnknownDemandLevel(String);

impl TryFrom<String> for DemandLevel {
    type Error = UnknownDemandLevel;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.as_str() {
            "Low" => Ok(DemandLevel::Low),
            "Medium" => Ok(DemandLevel::Medium),
            "High" => Ok(DemandLevel::High),
            _ => Err(UnknownDemandLevel(raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRole {
    pub id: Uuid,
    pub title: String,
    pub domain: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub required_skills: Vec<String>,
    #[sqlx(try_from = "String")]
    pub demand_level: DemandLevel,
    pub course_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub course_tags: Vec<String>,
    pub category: Option<String>,
    pub academic_level: String,
    pub deadline: Option<String>,
    pub amount_min: Option<i64>,
    pub amount_max: Option<i64>,
    pub eligibility: Option<String>,
}
