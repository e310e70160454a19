use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{FieldIssue, Issues};

pub const MIN_ANSWERS: usize = 8;
pub const MAX_ANSWERS: usize = 10;

/// Question id → chosen answer id. Ordered by question id so prompt
/// rendering is deterministic.
pub type Answers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsychometricSubmission {
    pub answers: Answers,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PsychometricInput {
    pub answers: Option<Answers>,
}

impl PsychometricSubmission {
    pub fn try_from_input(
        input: PsychometricInput,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, Vec<FieldIssue>> {
        let mut issues = Issues::new();

        let Some(answers) = input.answers else {
            issues.push("answers", "is required");
            return Err(issues.into_vec());
        };

        let mut trimmed = Answers::new();
        for (question, answer) in answers {
            let question = question.trim().to_string();
            let answer = answer.trim().to_string();
            if question.is_empty() {
                issues.push("answers", "question ids must not be empty");
                continue;
            }
            if answer.is_empty() {
                issues.push(format!("answers.{question}"), "must not be empty");
            }
            if trimmed.insert(question.clone(), answer).is_some() {
                issues.push(format!("answers.{question}"), "is answered more than once");
            }
        }

        if trimmed.len() < MIN_ANSWERS || trimmed.len() > MAX_ANSWERS {
            issues.push(
                "answers",
                format!(
                    "must contain between {MIN_ANSWERS} and {MAX_ANSWERS} answers (got {})",
                    trimmed.len()
                ),
            );
        }

        issues.finish(PsychometricSubmission {
            answers: trimmed,
            submitted_at,
        })
    }
}
