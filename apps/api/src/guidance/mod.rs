// Guidance: AI-generated analysis, portfolio and roadmap.
// All provider calls go through llm_client via the gateway here.

pub mod answers;
pub mod cache;
pub mod gateway;
pub mod handlers;
pub mod prompts;
pub mod schema;
