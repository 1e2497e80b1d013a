use chrono::Duration;
use jsl_lib::IssueSummary;

/// Suffix marking the status an issue had when it was fetched.
pub const CURRENT_SUFFIX: &str = " (current)";

pub fn current_label(status: &str) -> String {
    format!("{}{}", status, CURRENT_SUFFIX)
}

/// Session-local editable state of one fetched issue.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub key: String,
    pub short_description: String,
    pub original_status: String,
    pub estimate: Duration,
    pub logged: Duration,
    /// `"<original_status> (current)"` until the user picks another status.
    pub status: String,
    pub standard_time: String,
    pub meeting_time: String,
    pub is_selected: bool,
}

impl SessionRow {
    pub fn from_issue(issue: &IssueSummary) -> Self {
        Self {
            key: issue.key.clone(),
            short_description: issue.short_description.clone(),
            original_status: issue.status.clone(),
            estimate: issue.original_estimate,
            logged: issue.logged_time,
            status: current_label(&issue.status),
            standard_time: String::new(),
            meeting_time: String::new(),
            is_selected: false,
        }
    }

    /// Status to transition to, `None` while the sentinel is kept.
    pub fn requested_status(&self) -> Option<&str> {
        if self.status.ends_with(CURRENT_SUFFIX) {
            None
        } else {
            Some(self.status.as_str())
        }
    }
}

pub fn snapshot(issues: &[IssueSummary]) -> Vec<SessionRow> {
    issues.iter().map(SessionRow::from_issue).collect()
}

#[cfg(test)]
pub(crate) fn issue(key: &str, status: &str, estimate_hours: i64, logged_hours: i64) -> IssueSummary {
    IssueSummary {
        key: key.to_string(),
        status: status.to_string(),
        short_description: format!("{} description", key),
        original_estimate: Duration::hours(estimate_hours),
        logged_time: Duration::hours(logged_hours),
    }
}
