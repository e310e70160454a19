// Self-service profile and questionnaire endpoints.

pub mod handlers;
