// Common error types for create-privy-app

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The user-facing error type.
///
/// Every variant except [`CliError::Io`] is an *expected* failure: the
/// top-level handler prints it without a stack dump and exits with
/// [`CliError::exit_code`].
#[derive(Debug, Error)]
pub enum CliError {
    /// The target exists and cannot be used (a file, or a non-empty directory without `--force`)
    #[error("{message}")]
    DirectoryConflict { path: PathBuf, message: String },

    /// The target directory cannot be written to
    #[error("No write permission for directory: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other expected failure, carrying its own exit code
    #[error("{message}")]
    Message { message: String, exit_code: i32 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Create a generic error with the default exit code (1)
    pub fn new(message: impl Into<String>) -> Self {
        CliError::Message {
            message: message.into(),
            exit_code: 1,
        }
    }

    /// Create a generic error with an explicit exit code
    pub fn with_exit_code(message: impl Into<String>, exit_code: i32) -> Self {
        CliError::Message {
            message: message.into(),
            exit_code,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Message { exit_code, .. } => *exit_code,
            _ => 1,
        }
    }

    /// Whether this error is part of the normal rejection paths of the CLI
    pub fn is_expected(&self) -> bool {
        !matches!(self, CliError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
