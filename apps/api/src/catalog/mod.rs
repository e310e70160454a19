// Catalog: read-only job role and scholarship lookups.

pub mod filters;
pub mod handlers;

pub const JOB_ROLE_LIMIT: usize = 30;
pub const SCHOLARSHIP_LIMIT: usize = 50;
