pub mod catalog;
pub mod guidance;
pub mod profile;
pub mod psychometric;
pub mod user;
