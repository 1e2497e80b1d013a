use crate::common::common::Common;
use chrono::Duration;
use std::fmt;

/// Statuses a user may move an issue to from a session.
pub const ISSUE_STATUSES: [&str; 5] = ["Open", "In Progress", "In Review", "Done", "Obsolete"];

/// Statuses worth reviewing; anything else is dropped right after the fetch.
pub const ACTIVE_STATUSES: [&str; 3] = ["Open", "In Progress", "In Review"];

pub fn is_active_status(status: &str) -> bool {
    ACTIVE_STATUSES.contains(&status)
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueSummary {
    pub key: String,
    pub status: String,
    pub short_description: String,
    pub original_estimate: Duration,
    pub logged_time: Duration,
}

impl fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - ({}) {} of {}",
            self.key,
            self.short_description,
            self.status,
            Common::readable_hours(&self.logged_time),
            Common::readable_hours(&self.original_estimate)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub id: String,
    pub name: String,
}
