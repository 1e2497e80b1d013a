use config::{Config as ConfigLoader, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "~/.config/jsl.toml";
pub const DEFAULT_EPIC_LINK_FIELD: &str = "customfield_12790";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(alias = "JiraBaseUrl", alias = "jirabaseurl")]
    pub jira_base_url: String,
    /// Comma separated keys fetched on top of the issues assigned to the user.
    #[serde(default, alias = "AdditionalIssues", alias = "additionalissues")]
    pub additional_issues: String,
    /// When set, the token is sent with basic auth instead of as a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default = "default_epic_link_field")]
    pub epic_link_field: String,
}

fn default_epic_link_field() -> String {
    DEFAULT_EPIC_LINK_FIELD.to_string()
}

impl Config {
    pub fn new(jira_base_url: &str) -> Self {
        Self {
            jira_base_url: jira_base_url.to_string(),
            additional_issues: String::new(),
            username: None,
            epic_link_field: default_epic_link_field(),
        }
    }

    pub fn config_path() -> PathBuf {
        match std::env::var("JSL_CONFIG") {
            Ok(custom_path) => PathBuf::from(custom_path),
            Err(_) => PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).to_string()),
        }
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        let path_str = path.to_str().ok_or("config path is not valid UTF-8")?;
        let builder = ConfigLoader::builder()
            .add_source(File::new(path_str, FileFormat::Toml).required(true))
            .add_source(Environment::with_prefix("JSL"));
        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn additional_issue_keys(&self) -> Vec<String> {
        self.additional_issues
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
            .collect()
    }

    /// Adds comma separated keys, skipping the ones already followed. Returns the added keys.
    pub fn add_issues(&mut self, issues: &str) -> Vec<String> {
        let mut keys = self.additional_issue_keys();
        let mut added = Vec::new();
        for issue in issues.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            if keys.iter().any(|k| k == issue) {
                continue;
            }
            keys.push(issue.to_string());
            added.push(issue.to_string());
        }
        self.additional_issues = keys.join(",");
        added
    }

    pub fn remove_issue(&mut self, issue: &str) -> bool {
        let mut keys = self.additional_issue_keys();
        let before = keys.len();
        keys.retain(|k| k != issue.trim());
        self.additional_issues = keys.join(",");
        keys.len() != before
    }
}
