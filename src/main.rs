// create-privy-app
// Main CLI entry point

use clap::Parser;
use create_privy_app::cli::{Cli, CliDispatcher, CommandError};
use create_privy_app::utils::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = cli.load_config();
    let log_level = cli.log_level(config.as_ref().ok());
    init_logging(log_level);

    let result = match config {
        Ok(config) => CliDispatcher::execute(cli, config, log_level).await,
        Err(err) => Err(CommandError::from(err)),
    };

    if let Err(err) = result {
        err.report();
        process::exit(err.exit_code());
    }
}
