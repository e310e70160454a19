use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::validation::FieldIssue;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<FieldIssue>,
    },

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Prerequisite missing: {0}")]
    PrerequisiteMissing(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream failure: {message}")]
    Upstream {
        message: String,
        detail: Option<Value>,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(details: Vec<FieldIssue>) -> Self {
        AppError::Validation {
            message: "Invalid request".to_string(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::PrerequisiteMissing(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthenticated(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            message: "Invalid JSON body".to_string(),
            details: vec![FieldIssue {
                field: "body".to_string(),
                message: rejection.body_text(),
            }],
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation {
            message: "Invalid query string".to_string(),
            details: vec![FieldIssue {
                field: "query".to_string(),
                message: rejection.body_text(),
            }],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Validation { message, details } => (
                "VALIDATION_ERROR",
                message,
                serde_json::to_value(details).ok(),
            ),
            AppError::Unauthenticated(msg) => {
                tracing::debug!("Rejected bearer token: {msg}");
                ("UNAUTHENTICATED", msg, None)
            }
            e @ AppError::InvalidCredentials => ("INVALID_CREDENTIALS", e.to_string(), None),
            e @ AppError::DuplicateEmail => ("DUPLICATE_EMAIL", e.to_string(), None),
            AppError::NotFound(msg) => ("NOT_FOUND", msg, None),
            AppError::PrerequisiteMissing(msg) => ("PREREQUISITE_MISSING", msg, None),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                ("CONFIGURATION_ERROR", msg, None)
            }
            AppError::Upstream { message, detail } => {
                tracing::error!("Upstream failure: {message}");
                ("UPSTREAM_FAILURE", message, detail)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ("INTERNAL_ERROR", e.to_string(), None)
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}
