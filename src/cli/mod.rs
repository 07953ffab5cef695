// CLI module for command-line interface

pub mod create;

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::framework::Framework;
use crate::services::lifecycle_guard::Fault;
use crate::utils::config::{ConfigParser, UserConfig};
use crate::utils::error::{CliError, Result};
use crate::utils::logging::LogLevel;

use self::create::CreateCommand;

/// Main CLI structure
#[derive(Debug, Parser)]
#[command(name = "create-privy-app")]
#[command(about = "Create a Next.js or Vite app pre-wired for Privy authentication")]
#[command(long_about = r#"Create a new web application wired for Privy authentication.

The target directory is validated before anything is written:
  • A missing directory is created
  • An empty directory (or one holding only dot-files such as .git) is reused
  • A non-empty directory is refused unless --force is given
  • An existing file with the project name is always refused

If generation fails or is interrupted (Ctrl-C, SIGTERM), the partially
created project directory is removed again.

Examples:
  create-privy-app my-app                      Next.js app in ./my-app
  create-privy-app my-app --framework vite     Vite + React app
  create-privy-app my-app --force              Reuse a non-empty directory
  create-privy-app my-app --skip-install       Only write the Privy env files
  create-privy-app my-app --dry-run --verbose  Show what would happen"#)]
#[command(version)]
pub struct Cli {
    /// Project name (used as the directory name)
    #[arg(default_value = "my-privy-app")]
    pub name: String,

    /// Framework to scaffold
    #[arg(long, value_enum)]
    pub framework: Option<Framework>,

    /// Privy App ID (can be added to the env file later)
    #[arg(long, env = "PRIVY_APP_ID", default_value = "", hide_env_values = true)]
    pub app_id: String,

    /// Privy Client ID (can be added to the env file later)
    #[arg(long, env = "PRIVY_CLIENT_ID", default_value = "", hide_env_values = true)]
    pub client_id: String,

    /// Overwrite an existing non-empty directory
    #[arg(long)]
    pub force: bool,

    /// Show what would be done without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the framework scaffolder and package installs; only write env files
    #[arg(long, env = "CREATE_PRIVY_APP_SKIP_INSTALL")]
    pub skip_install: bool,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Show detailed progress and error details
    #[arg(short, long, conflicts_with_all = ["quiet", "silent"])]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, conflicts_with = "silent")]
    pub quiet: bool,

    /// Suppress all log output
    #[arg(long)]
    pub silent: bool,

    /// Path to a config.toml with user defaults
    #[arg(long, env = "CREATE_PRIVY_APP_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load user defaults from `--config` or the platform config dir
    pub fn load_config(&self) -> Result<UserConfig> {
        match &self.config {
            Some(path) => ConfigParser::load_from(path),
            None => ConfigParser::load_user_config(),
        }
    }

    /// Verbosity from flags first, then from config, then the default
    pub fn log_level(&self, config: Option<&UserConfig>) -> LogLevel {
        LogLevel::from_flags(self.verbose, self.quiet, self.silent)
            .or_else(|| config.and_then(|config| config.log_level))
            .unwrap_or_default()
    }
}

/// Failure of a whole command invocation
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Cli(#[from] CliError),

    /// Already reported and cleaned up by the lifecycle guard
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl CommandError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Cli(err) => err.exit_code(),
            CommandError::Fault(fault) => fault.exit_code(),
        }
    }

    /// Log the error unless the lifecycle guard already did
    pub fn report(&self) {
        if let CommandError::Cli(err) = self {
            error!("{}", err);
            if !err.is_expected() {
                debug!("{:?}", err);
            }
        }
    }
}

/// CLI command dispatcher
pub struct CliDispatcher;

impl CliDispatcher {
    /// Execute the create command with resolved configuration
    pub async fn execute(cli: Cli, config: UserConfig, log_level: LogLevel) -> std::result::Result<(), CommandError> {
        let cmd = CreateCommand {
            framework: cli.framework.or(config.framework).unwrap_or_default(),
            name: cli.name,
            app_id: cli.app_id,
            client_id: cli.client_id,
            force: cli.force,
            dry_run: cli.dry_run,
            skip_install: cli.skip_install,
            json: cli.json,
            log_level,
        };
        cmd.run().await.map(|_| ())
    }
}
