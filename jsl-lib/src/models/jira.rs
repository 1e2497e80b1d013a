use crate::models::data::IssueSummary;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub const SCRUM_MEETINGS_SUMMARY: &str = "Scrum meetings";

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JiraSearchResponse {
    #[serde(default)]
    pub total: usize,
    pub issues: Vec<JiraIssue>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JiraIssue {
    pub id: String,
    pub key: String,
    pub fields: JiraFields,
}

impl fmt::Display for JiraIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self
            .fields
            .status
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("?");
        write!(f, "[{}] {} - ({})", self.key, self.fields.summary, status)
    }
}

impl JiraIssue {
    pub fn status_name(&self) -> Option<&str> {
        self.fields.status.as_ref().map(|s| s.name.as_str())
    }

    pub fn into_summary(self) -> IssueSummary {
        IssueSummary {
            status: self.status_name().unwrap_or_default().to_string(),
            key: self.key,
            short_description: self.fields.summary,
            original_estimate: Duration::seconds(self.fields.timeoriginalestimate.unwrap_or(0)),
            logged_time: Duration::seconds(self.fields.timespent.unwrap_or(0)),
        }
    }

    /// Key of the epic this issue belongs to, read from the given custom field.
    pub fn epic_key(&self, epic_link_field: &str) -> Option<String> {
        match self.fields.custom.get(epic_link_field) {
            Some(Value::String(key)) if !key.is_empty() => Some(key.clone()),
            _ => None,
        }
    }

    /// First outward linked issue whose summary mentions the scrum meetings.
    pub fn scrum_meetings_issue(&self) -> Option<&str> {
        self.fields
            .issuelinks
            .iter()
            .filter_map(|link| link.outward_issue.as_ref())
            .find(|issue| issue.fields.summary.contains(SCRUM_MEETINGS_SUMMARY))
            .map(|issue| issue.key.as_str())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: String,
    pub status: Option<JiraStatus>,
    /// Seconds.
    pub timeoriginalestimate: Option<i64>,
    /// Seconds.
    pub timespent: Option<i64>,
    #[serde(default)]
    pub issuelinks: Vec<JiraIssueLink>,
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JiraStatus {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueLink {
    pub outward_issue: Option<JiraLinkedIssue>,
    pub inward_issue: Option<JiraLinkedIssue>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JiraLinkedIssue {
    pub key: String,
    pub fields: JiraLinkedFields,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JiraLinkedFields {
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct JiraTransitionsResponse {
    pub transitions: Vec<JiraTransition>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct JiraTransition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct JiraTransitionRequest {
    pub transition: JiraTransitionId,
}

#[derive(Debug, Serialize)]
pub struct JiraTransitionId {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraWorklogRequest {
    pub time_spent: String,
    pub started: String,
}

#[derive(Debug, Error)]
pub enum JiraError {
    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("jira answered {0}")]
    ApiError(String),
    #[error("couldn't read jira response: {0}")]
    DeserializeError(String),
    #[error("please set the JIRA_PAT environment variable")]
    MissingToken,
    #[error("couldn't find epic for {0} issue")]
    EpicNotFound(String),
    #[error("couldn't find scrum meetings issue for {issue} issue under {epic} epic")]
    ScrumIssueNotFound { issue: String, epic: String },
    #[error("couldn't find a transition to '{status}' for {issue} issue")]
    TransitionNotFound { issue: String, status: String },
}
