use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{FieldIssue, Issues};

pub const MIN_AGE: i64 = 12;
pub const MAX_AGE: i64 = 100;
const MIN_FULL_NAME_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "Middle School")]
    MiddleSchool,
    #[serde(rename = "High School")]
    HighSchool,
    Diploma,
    Undergraduate,
    Postgraduate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 5] = [
        EducationLevel::MiddleSchool,
        EducationLevel::HighSchool,
        EducationLevel::Diploma,
        EducationLevel::Undergraduate,
        EducationLevel::Postgraduate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::MiddleSchool => "Middle School",
            EducationLevel::HighSchool => "High School",
            EducationLevel::Diploma => "Diploma",
            EducationLevel::Undergraduate => "Undergraduate",
            EducationLevel::Postgraduate => "Postgraduate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == raw)
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated student profile. Only constructible through [`Profile::try_from_input`]
/// or by deserializing a previously stored profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub age: u8,
    pub education_level: EducationLevel,
    pub interests: Vec<String>,
}

/// Raw `POST /user/profile` body. Every field is optional so that missing
/// fields surface as field-level issues instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub full_name: Option<String>,
    pub age: Option<Value>,
    pub education_level: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl Profile {
    pub fn try_from_input(input: ProfileInput) -> Result<Self, Vec<FieldIssue>> {
        let mut issues = Issues::new();

        let full_name = input.full_name.unwrap_or_default().trim().to_string();
        if full_name.chars().count() < MIN_FULL_NAME_CHARS {
            issues.push(
                "fullName",
                format!("must be at least {MIN_FULL_NAME_CHARS} characters"),
            );
        }

        let age = match input.age.as_ref() {
            None | Some(Value::Null) => {
                issues.push("age", "is required");
                0
            }
            Some(value) => match value.as_i64() {
                Some(age) if (MIN_AGE..=MAX_AGE).contains(&age) => age as u8,
                Some(_) => {
                    issues.push("age", format!("must be between {MIN_AGE} and {MAX_AGE}"));
                    0
                }
                None => {
                    issues.push("age", "must be an integer");
                    0
                }
            },
        };

        let education_level = match input.education_level.as_deref().map(str::trim) {
            Some(raw) => EducationLevel::parse(raw),
            None => None,
        };
        if education_level.is_none() {
            let allowed: Vec<&str> = EducationLevel::ALL.iter().map(|l| l.as_str()).collect();
            issues.push(
                "educationLevel",
                format!("must be one of: {}", allowed.join(", ")),
            );
        }

        let interests: Vec<String> = input
            .interests
            .unwrap_or_default()
            .into_iter()
            .map(|interest| interest.trim().to_string())
            .collect();
        if interests.is_empty() {
            issues.push("interests", "must contain at least one interest");
        }
        for (i, interest) in interests.iter().enumerate() {
            if interest.is_empty() {
                issues.push(format!("interests[{i}]"), "must not be empty");
            }
        }

        match education_level {
            Some(education_level) => issues.finish(Profile {
                full_name,
                age,
                education_level,
                interests,
            }),
            None => Err(issues.into_vec()),
        }
    }
}
