//! Interactive review of the user's issues followed by the concurrent submission of the
//! changes to Jira.
//!
//! Rows flow through selection, edition and summary until the user confirms, then every
//! changed field becomes an independent submission task.

pub mod bounded;
pub mod edit;
pub mod prompt;
pub mod rows;
pub mod selection;
pub mod submission;
pub mod summary;

use crate::logger::Logger;
use crate::{info, warn};
use anyhow::{Context, Result};
use bounded::{with_spinner, Deadlines};
use chrono::{DateTime, Local};
use jsl_lib::common::common::Common;
use jsl_lib::config::Config;
use jsl_lib::{IssueSummary, IssueTracker};
use prompt::Prompter;
use rows::SessionRow;
use std::sync::Arc;
use std::time::Duration;
use submission::SubmissionReport;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Days added to today for the worklogs' start date, negative for past days.
    pub day_delta: i64,
    pub deadlines: Deadlines,
}

/// Loops over selection, edition and summary until the user confirms.
pub fn review(rows: &mut [SessionRow], prompter: &dyn Prompter) -> Result<()> {
    loop {
        selection::select(rows, prompter)?;
        edit::edit(rows, prompter)?;
        if summary::confirm(rows, prompter)? {
            return Ok(());
        }
    }
}

/// Fetches the active issues, giving up with an empty list at the deadline.
pub async fn fetch_issues(
    config: &Config,
    tracker: Arc<dyn IssueTracker>,
    deadline: Duration,
) -> Result<Vec<IssueSummary>> {
    let config = config.clone();
    let fetching = tokio::spawn(async move { tracker.fetch_assigned_issues(&config).await });
    match with_spinner("Fetching jira issues...", deadline, fetching).await {
        Ok(joined) => {
            let issues = joined
                .context("Fetching jira issues crashed")?
                .context("Couldn't get issues from Jira API. Check internet connection and vpn if applicable")?;
            Ok(issues)
        }
        Err(_) => {
            warn!(
                "Fetching jira issues failed, probably due to {}s timeout...",
                deadline.as_secs()
            );
            Ok(Vec::new())
        }
    }
}

fn worklog_start(day_delta: i64) -> Result<DateTime<Local>> {
    Common::started_at(day_delta)
        .with_context(|| format!("A day offset of {} is out of range", day_delta))
}

/// Runs a whole session once: fetch, review, submit.
pub async fn run(
    config: &Config,
    tracker: Arc<dyn IssueTracker>,
    prompter: &dyn Prompter,
    sink: Arc<dyn Logger>,
    options: SessionOptions,
) -> Result<SubmissionReport> {
    // Reject an unusable day offset before the user fills any form.
    worklog_start(options.day_delta)?;
    let issues = fetch_issues(config, tracker.clone(), options.deadlines.fetch).await?;
    if issues.is_empty() {
        info!("No active issues found.");
    }
    let mut rows = rows::snapshot(&issues);

    review(&mut rows, prompter)?;

    let started = worklog_start(options.day_delta)?;
    let report = submission::submit(
        &rows,
        tracker,
        sink,
        started,
        options.deadlines.submission,
    )
    .await;
    if report.timed_out {
        warn!(
            "Logging jira issues failed, probably due to {}s timeout...",
            options.deadlines.submission.as_secs()
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::CollectingLogger;
    use crate::session::prompt::scripted::ScriptedPrompter;
    use crate::session::rows::issue;
    use crate::session::submission::fake::FakeTracker;
    use crate::session::submission::TaskKind;

    fn config() -> Config {
        Config::new("https://jira.example.com")
    }

    fn tracker() -> Arc<FakeTracker> {
        Arc::new(FakeTracker {
            issues: vec![
                issue("PROJ-1", "Open", 8, 2),
                issue("PROJ-2", "In Review", 4, 4),
            ],
            ..FakeTracker::default()
        })
    }

    #[tokio::test]
    async fn test_end_to_end_session() {
        let tracker = tracker();
        let prompter = ScriptedPrompter::default()
            .pick(&[0, 1])
            .edit("3h", "", "Done")
            .edit("", "1h", "In Review (current)")
            .answer(true);
        let sink = Arc::new(CollectingLogger::new());

        let report = run(&config(), tracker.clone(), &prompter, sink.clone(), SessionOptions::default())
            .await
            .unwrap();

        assert_eq!(report.dispatched, 3);
        assert_eq!(report.failures(), 0);
        let mut kinds: Vec<(String, TaskKind)> = report
            .outcomes
            .iter()
            .map(|o| (o.task.key.clone(), o.task.kind))
            .collect();
        kinds.sort_by_key(|(key, kind)| (key.clone(), *kind as u8));
        assert_eq!(
            kinds,
            vec![
                ("PROJ-1".to_string(), TaskKind::StandardTime),
                ("PROJ-1".to_string(), TaskKind::Transition),
                ("PROJ-2".to_string(), TaskKind::MeetingTime),
            ]
        );
        assert_eq!(
            tracker.recorded(),
            vec!["meeting PROJ-2 1h", "transition PROJ-1 14", "worklog PROJ-1 3h"]
        );

        let summaries = prompter.shown_summaries.lock().unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].contains("4.00h"));
        assert!(summaries[0].contains("Open → Done"));
        assert_eq!(sink.get_messages().len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_summary_loops_with_seeds() {
        let tracker = tracker();
        let prompter = ScriptedPrompter::default()
            .pick(&[0])
            .edit("3h", "", "Open (current)")
            .answer(false)
            .pick(&[0, 1])
            .edit("2h", "", "Open (current)")
            .edit("", "", "In Review (current)")
            .answer(true);
        let sink = Arc::new(CollectingLogger::new());

        let report = run(&config(), tracker.clone(), &prompter, sink, SessionOptions::default())
            .await
            .unwrap();

        let picks = prompter.shown_picks.lock().unwrap();
        assert_eq!(picks[0].1, Vec::<usize>::new());
        assert_eq!(picks[1].1, vec![0]);
        let groups = prompter.shown_groups.lock().unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[1].title, "PROJ-1");
        assert_eq!(groups[1].standard_time, "3h");
        assert_eq!(report.dispatched, 1);
        assert_eq!(tracker.recorded(), vec!["worklog PROJ-1 2h"]);
    }

    #[tokio::test]
    async fn test_deselected_rows_are_not_submitted() {
        let tracker = tracker();
        let prompter = ScriptedPrompter::default()
            .pick(&[0, 1])
            .edit("3h", "", "Open (current)")
            .edit("1h", "", "Done")
            .answer(false)
            .pick(&[1])
            .edit("1h", "", "Done")
            .answer(true);
        let sink = Arc::new(CollectingLogger::new());

        let report = run(&config(), tracker.clone(), &prompter, sink, SessionOptions::default())
            .await
            .unwrap();

        assert_eq!(report.dispatched, 2);
        assert_eq!(
            tracker.recorded(),
            vec!["transition PROJ-2 14", "worklog PROJ-2 1h"]
        );
    }

    #[tokio::test]
    async fn test_interaction_failure_aborts_before_submission() {
        let tracker = tracker();
        let prompter = ScriptedPrompter::default().pick(&[0]).edit("3h", "", "Done");
        let sink = Arc::new(CollectingLogger::new());

        let error = run(&config(), tracker.clone(), &prompter, sink, SessionOptions::default())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Confirmation form failed");
        assert!(tracker.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal() {
        let tracker = Arc::new(FakeTracker {
            issues: vec![issue("PROJ-1", "Open", 8, 2)],
            failing_fetch: true,
            ..FakeTracker::default()
        });
        let prompter = ScriptedPrompter::default();
        let sink = Arc::new(CollectingLogger::new());

        let error = run(&config(), tracker.clone(), &prompter, sink.clone(), SessionOptions::default())
            .await
            .unwrap_err();

        assert!(format!("{:#}", error).contains("401 Unauthorized"));
        assert!(prompter.shown_picks.lock().unwrap().is_empty());
        assert!(tracker.recorded().is_empty());
        assert!(sink.get_messages().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_day_offset_is_rejected_up_front() {
        let tracker = tracker();
        let prompter = ScriptedPrompter::default();
        let options = SessionOptions {
            day_delta: 1_000_000_000,
            ..SessionOptions::default()
        };

        let error = run(&config(), tracker.clone(), &prompter, Arc::new(CollectingLogger::new()), options)
            .await
            .unwrap_err();

        assert!(error.to_string().contains("out of range"));
        assert!(prompter.shown_picks.lock().unwrap().is_empty());
        assert!(tracker.recorded().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_yields_no_issues() {
        let tracker = Arc::new(FakeTracker {
            issues: vec![issue("PROJ-1", "Open", 8, 2)],
            delay: Some(Duration::from_secs(30)),
            ..FakeTracker::default()
        });

        let issues = fetch_issues(&config(), tracker, Duration::from_secs(10))
            .await
            .unwrap();
        assert!(issues.is_empty());
    }
}
