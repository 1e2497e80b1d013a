use crate::commands::Command;
use crate::logger;
use crate::session::prompt::InquirePrompter;
use crate::session::{self, SessionOptions};
use crate::{error, info, success, warn};
use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};
use jsl_lib::config::Config;
use jsl_lib::services::jira_service::JiraService;
use jsl_lib::IssueTracker;
use std::sync::Arc;

/// About a century either way.
const MAX_DAY_DELTA: i64 = 36_500;

pub fn days_arg() -> Arg {
    Arg::new("days")
        .short('d')
        .long("days")
        .help("Day delta from today for the logged time (negative for past days)")
        .value_parser(clap::value_parser!(i64).range(-MAX_DAY_DELTA..=MAX_DAY_DELTA))
        .allow_negative_numbers(true)
}

pub struct LogCommand;

#[async_trait]
impl Command for LogCommand {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn execute(&self, matches: &ArgMatches) {
        let day_delta = matches
            .try_get_one::<i64>("days")
            .ok()
            .flatten()
            .copied()
            .unwrap_or(0);
        let config = match Config::load() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: couldn't load {}: {}", Config::config_path().display(), err);
                std::process::exit(1);
            }
        };
        let tracker: Arc<dyn IssueTracker> = match JiraService::from_env(&config) {
            Ok(service) => Arc::new(service),
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        };

        let options = SessionOptions {
            day_delta,
            ..SessionOptions::default()
        };
        match session::run(&config, tracker, &InquirePrompter, logger::global_logger(), options).await {
            Ok(report) => {
                let failed: Vec<String> = report
                    .failed()
                    .map(|outcome| format!("{} ({})", outcome.task.key, outcome.task.kind))
                    .collect();
                if !failed.is_empty() {
                    info!(
                        "{} of {} changes failed: {}",
                        failed.len(),
                        report.dispatched,
                        failed.join(", ")
                    );
                }
                if report.unreported() > 0 && !report.timed_out {
                    warn!(
                        "{} of {} changes never reported back",
                        report.unreported(),
                        report.dispatched
                    );
                }
                if report.dispatched > 0 && report.all_succeeded() {
                    success!("All {} changes submitted", report.dispatched);
                }
            }
            Err(err) => {
                error!("{:#}", err);
                std::process::exit(1);
            }
        }
    }

    fn clap_command(&self) -> ClapCommand {
        ClapCommand::new(self.name())
            .about("Review assigned issues, log time and change statuses (default command)")
            .arg(days_arg())
    }
}
