use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Best-effort recursive removal of a partially generated project.
///
/// Both entry points return the underlying result so call sites can discard
/// it explicitly; a failure is already logged as a warning and must never
/// replace the error that triggered the cleanup.
pub struct CleanupAction;

impl CleanupAction {
    /// Remove `path` and everything below it. `Ok(false)` means there was
    /// nothing to remove.
    pub async fn run(path: &Path) -> io::Result<bool> {
        match fs::try_exists(path).await {
            Ok(false) => return Ok(false),
            Ok(true) => {}
            Err(e) => {
                warn!("Warning: Could not clean up project directory: {}", path.display());
                return Err(e);
            }
        }

        debug!("Cleaning up partially created project at: {}", path.display());
        match remove_any(path).await {
            Ok(()) => {
                debug!("Cleanup completed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                warn!("Warning: Could not clean up project directory: {}", path.display());
                debug!("Cleanup failure: {}", e);
                Err(e)
            }
        }
    }

    /// Synchronous variant for contexts without a runtime (the panic hook)
    pub fn run_blocking(path: &Path) -> io::Result<bool> {
        let metadata = match std::fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                warn!("Warning: Could not clean up project directory: {}", path.display());
                return Err(e);
            }
        };

        debug!("Cleaning up partially created project at: {}", path.display());
        let result = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };

        match result {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                warn!("Warning: Could not clean up project directory: {}", path.display());
                Err(e)
            }
        }
    }
}

async fn remove_any(path: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path).await?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}

/// Capability to clean up one tracked project path.
///
/// Cloning shares nothing mutable; every clone targets the same path and
/// invoking any of them repeatedly is harmless.
#[derive(Debug, Clone, Default)]
pub struct CleanupHandle {
    path: Option<PathBuf>,
}

impl CleanupHandle {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Handle that never removes anything (dry runs, guards without a target)
    pub fn noop() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn cleanup(&self) -> io::Result<bool> {
        match &self.path {
            Some(path) => CleanupAction::run(path).await,
            None => Ok(false),
        }
    }

    pub fn cleanup_blocking(&self) -> io::Result<bool> {
        match &self.path {
            Some(path) => CleanupAction::run_blocking(path),
            None => Ok(false),
        }
    }
}
