// Logging setup
//
// The library only emits `tracing` events; verbosity policy lives here and is
// applied once by the binary.

use serde::Deserialize;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// How much output the CLI produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Nothing at all
    Silent,
    /// Warnings and errors only
    Quiet,
    /// Regular progress output
    #[default]
    Normal,
    /// Everything, including detail dumps for unexpected faults
    Verbose,
}

impl LogLevel {
    /// Pick a level from the mutually exclusive verbosity flags
    pub fn from_flags(verbose: bool, quiet: bool, silent: bool) -> Option<Self> {
        if silent {
            Some(LogLevel::Silent)
        } else if quiet {
            Some(LogLevel::Quiet)
        } else if verbose {
            Some(LogLevel::Verbose)
        } else {
            None
        }
    }

    /// The `EnvFilter` directive for this level
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Quiet => "warn",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the CLI-derived level.
pub fn init_logging(level: LogLevel) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    // A second initialization (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
