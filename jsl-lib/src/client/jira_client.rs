use crate::config::Config;
use crate::models::jira::{
    JiraError, JiraIssue, JiraSearchResponse, JiraTransition, JiraTransitionId,
    JiraTransitionRequest, JiraTransitionsResponse, JiraWorklogRequest,
};
use base64::engine::general_purpose;
use base64::Engine;
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

pub const TOKEN_ENV_VAR: &str = "JIRA_PAT";
pub const MAX_RESULTS: usize = 1000;

#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    client: Client,
    auth_header: String,
}

impl JiraClient {
    pub fn new(config: &Config, token: &str) -> Self {
        let auth_header = match &config.username {
            Some(username) => {
                let credentials = format!("{}:{}", username, token);
                format!("Basic {}", general_purpose::STANDARD.encode(credentials))
            }
            None => format!("Bearer {}", token),
        };
        JiraClient {
            base_url: config.jira_base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_header,
        }
    }

    /// Builds a client with the token found in `JIRA_PAT`.
    pub fn from_env(config: &Config) -> Result<Self, JiraError> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(config, token.trim())),
            _ => Err(JiraError::MissingToken),
        }
    }

    pub async fn search_issues(&self, jql: &str) -> Result<Vec<JiraIssue>, JiraError> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        debug!("searching issues with '{}'", jql);
        let max_results = MAX_RESULTS.to_string();
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .query(&[
                ("jql", jql),
                ("maxResults", max_results.as_str()),
                ("fields", "summary,status,timeoriginalestimate,timespent"),
            ])
            .send()
            .await?;
        let page: JiraSearchResponse = read_json(response).await?;
        debug!("{} of {} issues received", page.issues.len(), page.total);
        Ok(page.issues)
    }

    pub async fn get_issue(&self, issue_key: &str, fields: &str) -> Result<JiraIssue, JiraError> {
        let url = format!("{}/rest/api/2/issue/{}", self.base_url, issue_key);
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .query(&[("fields", fields)])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn add_worklog(&self, issue_key: &str, worklog: &JiraWorklogRequest) -> Result<(), JiraError> {
        let url = format!("{}/rest/api/2/issue/{}/worklog", self.base_url, issue_key);
        debug!("adding worklog {:?} to {}", worklog, issue_key);
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .json(worklog)
            .send()
            .await?;
        check_status(response)
    }

    pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>, JiraError> {
        let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, issue_key);
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.auth_header)
            .send()
            .await?;
        let transitions: JiraTransitionsResponse = read_json(response).await?;
        Ok(transitions.transitions)
    }

    pub async fn do_transition(&self, issue_key: &str, transition_id: &str) -> Result<(), JiraError> {
        let url = format!("{}/rest/api/2/issue/{}/transitions", self.base_url, issue_key);
        let body = JiraTransitionRequest {
            transition: JiraTransitionId {
                id: transition_id.to_string(),
            },
        };
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .json(&body)
            .send()
            .await?;
        check_status(response)
    }
}

fn check_status(response: Response) -> Result<(), JiraError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(JiraError::ApiError(response.status().to_string()))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, JiraError> {
    if !response.status().is_success() {
        return Err(JiraError::ApiError(response.status().to_string()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| JiraError::DeserializeError(e.to_string()))
}
