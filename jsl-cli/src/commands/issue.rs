use crate::commands::Command;
use crate::{info, success, warn};
use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};
use jsl_lib::config::Config;

pub struct IssueCommand;

#[async_trait]
impl Command for IssueCommand {
    fn name(&self) -> &'static str {
        "issue"
    }

    async fn execute(&self, matches: &ArgMatches) {
        match matches.subcommand() {
            Some(("add", sub_matches)) => IssueAddCommand.execute(sub_matches).await,
            Some(("rm", sub_matches)) => IssueRemoveCommand.execute(sub_matches).await,
            _ => IssueListCommand.execute(matches).await,
        }
    }

    fn clap_command(&self) -> ClapCommand {
        ClapCommand::new(self.name())
            .about("Manage issues reviewed on top of the assigned ones")
            .subcommand(IssueAddCommand.clap_command())
            .subcommand(IssueRemoveCommand.clap_command())
            .subcommand(IssueListCommand.clap_command())
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: couldn't load {}: {}", Config::config_path().display(), err);
            std::process::exit(1);
        }
    }
}

fn save_config(config: &Config) {
    if let Err(err) = config.save() {
        eprintln!("Error: couldn't update {}: {}", Config::config_path().display(), err);
        std::process::exit(1);
    }
}

struct IssueAddCommand;

#[async_trait]
impl Command for IssueAddCommand {
    fn name(&self) -> &'static str {
        "add"
    }

    async fn execute(&self, matches: &ArgMatches) {
        let Some(issues) = matches.get_one::<String>("issues") else {
            return;
        };
        let mut config = load_config();
        let added = config.add_issues(issues);
        if added.is_empty() {
            info!("Nothing new to add.");
            return;
        }
        save_config(&config);
        success!("Added {}", added.join(", "));
    }

    fn clap_command(&self) -> ClapCommand {
        ClapCommand::new(self.name())
            .about("Add issues, comma separated: ABC-22,ABC-11")
            .arg(
                Arg::new("issues")
                    .help("Issue keys")
                    .required(true)
                    .index(1),
            )
    }
}

struct IssueRemoveCommand;

#[async_trait]
impl Command for IssueRemoveCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    async fn execute(&self, matches: &ArgMatches) {
        let Some(issue) = matches.get_one::<String>("issue") else {
            return;
        };
        let mut config = load_config();
        if config.remove_issue(issue) {
            save_config(&config);
            success!("Removed {}", issue);
        } else {
            warn!("{} is not in the additional issues", issue);
        }
    }

    fn clap_command(&self) -> ClapCommand {
        ClapCommand::new(self.name())
            .about("Remove one issue")
            .arg(
                Arg::new("issue")
                    .help("Issue key")
                    .required(true)
                    .index(1),
            )
    }
}

struct IssueListCommand;

#[async_trait]
impl Command for IssueListCommand {
    fn name(&self) -> &'static str {
        "list"
    }

    async fn execute(&self, _matches: &ArgMatches) {
        let keys = load_config().additional_issue_keys();
        if keys.is_empty() {
            println!("No additional issue.");
        }
        keys.iter().for_each(|key| println!("{}", key));
    }

    fn clap_command(&self) -> ClapCommand {
        ClapCommand::new(self.name()).about("List additional issues")
    }
}
