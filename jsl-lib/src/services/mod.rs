pub mod jira_service;
