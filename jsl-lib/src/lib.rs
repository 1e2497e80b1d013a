pub mod client;
pub mod common;
pub mod config;
pub mod duration;
pub mod models;
pub mod services;

pub use models::data::{IssueSummary, Transition, ISSUE_STATUSES};
pub use services::jira_service::IssueTracker;
