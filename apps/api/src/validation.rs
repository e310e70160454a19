//! Field-level validation issues shared by request value objects and the
//! AI response schemas.

use serde::{Deserialize, Serialize};

/// A single constraint violation, addressed by a dotted/indexed field path
/// such as `interests[2]` or `stages[0].skills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Accumulates issues while a value object is being constructed.
#[derive(Debug, Default)]
pub struct Issues(Vec<FieldIssue>);

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Records an issue unless `value` has at least one non-whitespace char.
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    /// Checks the list length is within `[min, max]` and every entry is non-empty.
    pub fn require_text_list(&mut self, field: &str, values: &[String], min: usize, max: usize) {
        if values.len() < min || values.len() > max {
            self.push(
                field,
                format!("must contain between {min} and {max} items (got {})", values.len()),
            );
        }
        for (i, value) in values.iter().enumerate() {
            if value.trim().is_empty() {
                self.push(format!("{field}[{i}]"), "must not be empty");
            }
        }
    }

    /// Appends issues from a nested object, prefixing their paths.
    pub fn extend_nested(&mut self, prefix: &str, nested: Vec<FieldIssue>) {
        self.0.extend(nested.into_iter().map(|issue| FieldIssue {
            field: format!("{prefix}.{}", issue.field),
            message: issue.message,
        }));
    }

    pub fn into_vec(self) -> Vec<FieldIssue> {
        self.0
    }

    /// `Ok(value)` when nothing was recorded, otherwise every issue.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldIssue>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}
