pub mod data;
pub mod jira;
