pub mod host;
pub mod human;
pub mod report;
pub mod templates;
