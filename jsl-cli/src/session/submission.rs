use crate::logger::{timestamped_error, timestamped_success, Logger};
use crate::session::bounded::Spinner;
use crate::session::rows::SessionRow;
use chrono::{DateTime, Local};
use futures::stream::{FuturesUnordered, StreamExt};
use jsl_lib::models::jira::JiraError;
use jsl_lib::IssueTracker;
use log::debug;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    StandardTime,
    MeetingTime,
    Transition,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::StandardTime => write!(f, "standard time"),
            TaskKind::MeetingTime => write!(f, "meeting time"),
            TaskKind::Transition => write!(f, "transition"),
        }
    }
}

/// One remote operation derived from an edited row field.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTask {
    pub key: String,
    pub kind: TaskKind,
    /// Raw duration for time entries, target status for transitions.
    pub value: String,
}

impl SubmissionTask {
    async fn run(&self, tracker: &dyn IssueTracker, started: DateTime<Local>) -> Result<(), JiraError> {
        match self.kind {
            TaskKind::StandardTime => {
                tracker
                    .submit_time_entry(&self.key, &self.value, started)
                    .await
            }
            TaskKind::MeetingTime => {
                tracker
                    .submit_meeting_time_entry(&self.key, &self.value, started)
                    .await
            }
            TaskKind::Transition => {
                let transitions = tracker.list_transitions(&self.key).await?;
                let transition = transitions
                    .iter()
                    .find(|t| t.name == self.value)
                    .ok_or_else(|| JiraError::TransitionNotFound {
                        issue: self.key.clone(),
                        status: self.value.clone(),
                    })?;
                tracker.apply_transition(&self.key, &transition.id).await
            }
        }
    }

    fn success_message(&self) -> String {
        match self.kind {
            TaskKind::StandardTime => {
                format!("Successfully logged {} standard time under {}", self.value, self.key)
            }
            TaskKind::MeetingTime => format!(
                "Successfully logged {} meeting time under {} scrum meetings",
                self.value, self.key
            ),
            TaskKind::Transition => {
                format!("Successfully transitioned issue {} to {} status", self.key, self.value)
            }
        }
    }

    fn failure_message(&self, error: &str) -> String {
        match self.kind {
            TaskKind::StandardTime => {
                format!("Couldn't log {} under {}: {}", self.value, self.key, error)
            }
            TaskKind::MeetingTime => format!(
                "Couldn't log {} under {} scrum meetings: {}",
                self.value, self.key, error
            ),
            TaskKind::Transition => format!(
                "Couldn't transition issue {} to {} status: {}",
                self.key, self.value, error
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub task: SubmissionTask,
    pub result: Result<(), String>,
}

#[derive(Debug, Default)]
pub struct SubmissionReport {
    pub dispatched: usize,
    /// Outcomes in completion order; tasks abandoned at the deadline are missing.
    pub outcomes: Vec<TaskOutcome>,
    pub timed_out: bool,
}

impl SubmissionReport {
    pub fn failed(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn failures(&self) -> usize {
        self.failed().count()
    }

    /// Dispatched tasks with no outcome: abandoned at the deadline or crashed.
    pub fn unreported(&self) -> usize {
        self.dispatched.saturating_sub(self.outcomes.len())
    }

    pub fn all_succeeded(&self) -> bool {
        !self.timed_out && self.unreported() == 0 && self.failures() == 0
    }
}

/// Tasks for every changed field of the selected rows, in row order.
pub fn plan(rows: &[SessionRow]) -> Vec<SubmissionTask> {
    let mut tasks = Vec::new();
    for row in rows.iter().filter(|row| row.is_selected) {
        if !row.standard_time.is_empty() {
            tasks.push(SubmissionTask {
                key: row.key.clone(),
                kind: TaskKind::StandardTime,
                value: row.standard_time.clone(),
            });
        }
        if !row.meeting_time.is_empty() {
            tasks.push(SubmissionTask {
                key: row.key.clone(),
                kind: TaskKind::MeetingTime,
                value: row.meeting_time.clone(),
            });
        }
        if let Some(status) = row.requested_status() {
            tasks.push(SubmissionTask {
                key: row.key.clone(),
                kind: TaskKind::Transition,
                value: status.to_string(),
            });
        }
    }
    tasks
}

/// Runs every planned task concurrently and waits for them until `deadline`.
///
/// Each task reports its own outcome to `sink` as soon as it finishes. When the deadline
/// expires the remaining tasks are left running detached: their calls are not interrupted
/// but nothing waits for or reports them.
pub async fn submit(
    rows: &[SessionRow],
    tracker: Arc<dyn IssueTracker>,
    sink: Arc<dyn Logger>,
    started: DateTime<Local>,
    deadline: Duration,
) -> SubmissionReport {
    let tasks = plan(rows);
    let mut report = SubmissionReport {
        dispatched: tasks.len(),
        ..SubmissionReport::default()
    };
    if tasks.is_empty() {
        sink.log("Nothing to submit.".to_string());
        return report;
    }
    debug!("dispatching {} tasks", tasks.len());

    let spinner = Spinner::start("Logging...");
    let sink = spinner.sink(sink);
    let mut pending: FuturesUnordered<_> = tasks
        .into_iter()
        .map(|task| {
            let tracker = tracker.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                let result = task.run(tracker.as_ref(), started).await;
                match &result {
                    Ok(()) => sink.log(timestamped_success(&task.success_message())),
                    Err(e) => sink.log(timestamped_error(&task.failure_message(&e.to_string()))),
                }
                TaskOutcome {
                    task,
                    result: result.map_err(|e| e.to_string()),
                }
            })
        })
        .collect();

    let outcomes = &mut report.outcomes;
    let joined = spinner
        .wait(deadline, async {
            while let Some(joined) = pending.next().await {
                match joined {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(join_error) => {
                        debug!("submission task died: {}", join_error);
                        sink.log(timestamped_error(&format!(
                            "A submission task crashed: {}",
                            join_error
                        )));
                    }
                }
            }
        })
        .await;
    report.timed_out = joined.is_err();
    report
}

#[cfg(test)]
pub(crate) mod fake {
    use async_trait::async_trait;
    use chrono::{DateTime, Local};
    use jsl_lib::config::Config;
    use jsl_lib::models::jira::JiraError;
    use jsl_lib::{IssueSummary, IssueTracker, Transition};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory tracker recording every call.
    #[derive(Default)]
    pub struct FakeTracker {
        pub issues: Vec<IssueSummary>,
        /// Issue keys whose standard time entry is rejected.
        pub failing_entries: Vec<String>,
        /// Issue keys whose epic has no scrum meetings issue.
        pub missing_scrum_issue: Vec<String>,
        /// Issue keys whose standard time entry panics mid-call.
        pub panicking_entries: Vec<String>,
        pub failing_fetch: bool,
        pub transitions: HashMap<String, Vec<Transition>>,
        pub delay: Option<Duration>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeTracker {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn recorded(&self) -> Vec<String> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort();
            calls
        }

        async fn wait(&self) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    pub fn default_transitions() -> Vec<Transition> {
        ["Open", "In Progress", "In Review", "Done"]
            .iter()
            .enumerate()
            .map(|(id, name)| Transition {
                id: format!("{}", id + 11),
                name: name.to_string(),
            })
            .collect()
    }

    #[async_trait]
    impl IssueTracker for FakeTracker {
        async fn fetch_assigned_issues(&self, _config: &Config) -> Result<Vec<IssueSummary>, JiraError> {
            self.wait().await;
            if self.failing_fetch {
                return Err(JiraError::ApiError("401 Unauthorized".to_string()));
            }
            Ok(self.issues.clone())
        }

        async fn submit_time_entry(
            &self,
            issue_key: &str,
            time_spent: &str,
            _started: DateTime<Local>,
        ) -> Result<(), JiraError> {
            self.wait().await;
            if self.panicking_entries.iter().any(|k| k == issue_key) {
                panic!("connection pool poisoned");
            }
            if self.failing_entries.iter().any(|k| k == issue_key) {
                return Err(JiraError::ApiError("500 Internal Server Error".to_string()));
            }
            self.record(format!("worklog {} {}", issue_key, time_spent));
            Ok(())
        }

        async fn submit_meeting_time_entry(
            &self,
            issue_key: &str,
            time_spent: &str,
            _started: DateTime<Local>,
        ) -> Result<(), JiraError> {
            self.wait().await;
            if self.missing_scrum_issue.iter().any(|k| k == issue_key) {
                return Err(JiraError::ScrumIssueNotFound {
                    issue: issue_key.to_string(),
                    epic: "EPIC-1".to_string(),
                });
            }
            self.record(format!("meeting {} {}", issue_key, time_spent));
            Ok(())
        }

        async fn list_transitions(&self, issue_key: &str) -> Result<Vec<Transition>, JiraError> {
            self.wait().await;
            Ok(self
                .transitions
                .get(issue_key)
                .cloned()
                .unwrap_or_else(default_transitions))
        }

        async fn apply_transition(&self, issue_key: &str, transition_id: &str) -> Result<(), JiraError> {
            self.record(format!("transition {} {}", issue_key, transition_id));
            Ok(())
        }
    }
}
