use crate::client::jira_client::JiraClient;
use crate::common::common::Common;
use crate::config::Config;
use crate::models::data::{is_active_status, IssueSummary, Transition};
use crate::models::jira::{JiraError, JiraWorklogRequest};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::{debug, info};

/// Remote operations a logging session relies on.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn fetch_assigned_issues(&self, config: &Config) -> Result<Vec<IssueSummary>, JiraError>;

    async fn submit_time_entry(
        &self,
        issue_key: &str,
        time_spent: &str,
        started: DateTime<Local>,
    ) -> Result<(), JiraError>;

    /// Logs time on the "Scrum meetings" issue linked to the epic of `issue_key`.
    async fn submit_meeting_time_entry(
        &self,
        issue_key: &str,
        time_spent: &str,
        started: DateTime<Local>,
    ) -> Result<(), JiraError>;

    async fn list_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, JiraError>;

    async fn apply_transition(&self, issue_key: &str, transition_id: &str) -> Result<(), JiraError>;
}

pub fn assigned_issues_jql(config: &Config) -> String {
    let additional = config.additional_issue_keys();
    if additional.is_empty() {
        "assignee = currentuser()".to_string()
    } else {
        format!(
            "assignee = currentuser() OR key in ({})",
            additional.join(",")
        )
    }
}

pub struct JiraService {
    jira_client: JiraClient,
    epic_link_field: String,
}

impl JiraService {
    pub fn new(jira_client: JiraClient, config: &Config) -> Self {
        Self {
            jira_client,
            epic_link_field: config.epic_link_field.clone(),
        }
    }

    pub fn from_env(config: &Config) -> Result<Self, JiraError> {
        Ok(Self::new(JiraClient::from_env(config)?, config))
    }

    async fn find_scrum_meetings_issue(&self, issue_key: &str) -> Result<String, JiraError> {
        let issue = self
            .jira_client
            .get_issue(issue_key, &self.epic_link_field)
            .await?;
        let epic_key = issue
            .epic_key(&self.epic_link_field)
            .ok_or_else(|| JiraError::EpicNotFound(issue_key.to_string()))?;
        debug!("{} belongs to epic {}", issue_key, epic_key);

        let epic = self.jira_client.get_issue(&epic_key, "issuelinks").await?;
        epic.scrum_meetings_issue()
            .map(String::from)
            .ok_or(JiraError::ScrumIssueNotFound {
                issue: issue_key.to_string(),
                epic: epic_key,
            })
    }
}

#[async_trait]
impl IssueTracker for JiraService {
    async fn fetch_assigned_issues(&self, config: &Config) -> Result<Vec<IssueSummary>, JiraError> {
        let jql = assigned_issues_jql(config);
        let issues = self.jira_client.search_issues(&jql).await?;
        let fetched = issues.len();
        let active: Vec<IssueSummary> = issues
            .into_iter()
            .filter(|issue| issue.status_name().is_some_and(is_active_status))
            .map(|issue| issue.into_summary())
            .collect();
        info!("{} issues fetched, {} still active", fetched, active.len());
        Ok(active)
    }

    async fn submit_time_entry(
        &self,
        issue_key: &str,
        time_spent: &str,
        started: DateTime<Local>,
    ) -> Result<(), JiraError> {
        let worklog = JiraWorklogRequest {
            time_spent: time_spent.to_string(),
            started: Common::jira_timestamp(&started),
        };
        self.jira_client.add_worklog(issue_key, &worklog).await
    }

    async fn submit_meeting_time_entry(
        &self,
        issue_key: &str,
        time_spent: &str,
        started: DateTime<Local>,
    ) -> Result<(), JiraError> {
        let scrum_issue = self.find_scrum_meetings_issue(issue_key).await?;
        debug!("meetings of {} are logged under {}", issue_key, scrum_issue);
        self.submit_time_entry(&scrum_issue, time_spent, started).await
    }

    async fn list_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, JiraError> {
        let transitions = self.jira_client.get_transitions(issue_key).await?;
        Ok(transitions
            .into_iter()
            .map(|t| Transition {
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    async fn apply_transition(&self, issue_key: &str, transition_id: &str) -> Result<(), JiraError> {
        self.jira_client.do_transition(issue_key, transition_id).await
    }
}
