use crate::commands::issue::IssueCommand;
use crate::commands::log::LogCommand;
use crate::commands::CommandRegistry;

mod commands;
mod logger;
mod session;

#[tokio::main]
async fn main() {
    let mut registry = CommandRegistry::new();
    registry.register(LogCommand);
    registry.register(IssueCommand);

    let app = commands::build_app(&registry);
    let matches = app.get_matches();

    if matches.get_flag("debug") {
        logger::enable_debug();
    }
    logger::init_logger_with_log_bridge(logger::stdout_logger());

    match matches.subcommand() {
        Some((name, sub_matches)) => registry.execute(name, sub_matches).await,
        None => registry.execute("log", &matches).await,
    }
}
