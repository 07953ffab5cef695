use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, warn};

use crate::models::project::{DirectoryState, ProjectPath, ValidationOptions};
use crate::services::cleanup::CleanupAction;
use crate::services::path_resolver::PathResolver;
use crate::utils::error::{CliError, Result};

/// Marker written and removed again to prove the target is writable
pub const WRITE_PROBE_FILE: &str = ".write-test";

/// Decides whether a project may be generated at a given location
#[derive(Debug, Clone)]
pub struct DirectoryGuard {
    resolver: PathResolver,
}

impl DirectoryGuard {
    /// Create a guard resolving names against the current working directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            resolver: PathResolver::from_current_dir()?,
        })
    }

    pub fn with_resolver(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Validate (and if needed create or clear) the directory for `name`.
    ///
    /// On success the returned path is the only one generation should write
    /// through. Under `dry_run` nothing is created, cleared or probed.
    pub async fn validate(&self, name: &str, options: ValidationOptions) -> Result<ProjectPath> {
        let project_path = self.resolver.resolve(name);
        debug!("Validating project directory: {}", project_path.display());

        let state = inspect(&project_path).await?;
        let mut created = false;

        match state {
            DirectoryState::ExistsAsFile => {
                return Err(CliError::DirectoryConflict {
                    message: format!("❌ A file with the name \"{}\" already exists", name),
                    path: project_path,
                });
            }
            DirectoryState::ExistsNonEmptyVisible if !options.force => {
                error!("❌ Directory \"{}\" already exists and is not empty.", name);
                warn!("Options:");
                warn!("  • Use --force to overwrite the existing directory");
                warn!("  • Choose a different project name");
                warn!("  • Remove the existing directory manually");
                return Err(CliError::DirectoryConflict {
                    message: "Directory already exists".to_string(),
                    path: project_path,
                });
            }
            DirectoryState::ExistsNonEmptyVisible => {
                warn!("⚠️  Directory \"{}\" exists and is not empty. Using --force flag.", name);
                if !options.dry_run {
                    debug!("Removing existing directory contents...");
                    empty_dir(&project_path).await?;
                }
            }
            DirectoryState::ExistsEmpty | DirectoryState::ExistsNonEmptyHiddenOnly => {
                debug!("Directory exists but is empty, proceeding...");
            }
            DirectoryState::Absent => {
                if !options.dry_run {
                    debug!("Creating directory: {}", project_path.display());
                    fs::create_dir_all(&project_path).await?;
                    created = true;
                }
            }
        }

        if !options.dry_run {
            if let Err(source) = probe_write_permission(&project_path).await {
                if created {
                    let _ = CleanupAction::run(&project_path).await;
                }
                return Err(CliError::PermissionDenied {
                    path: project_path,
                    source,
                });
            }
        }

        debug!("Directory validation completed: {}", project_path.display());
        Ok(ProjectPath::new(project_path))
    }
}

/// Classify what sits at `path`.
///
/// Entries whose name starts with `.` do not count towards emptiness.
pub async fn inspect(path: &Path) -> io::Result<DirectoryState> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(DirectoryState::Absent),
        Err(e) => return Err(e),
    };

    if !metadata.is_dir() {
        return Ok(DirectoryState::ExistsAsFile);
    }

    let mut entries = fs::read_dir(path).await?;
    let mut saw_hidden = false;
    while let Some(entry) = entries.next_entry().await? {
        if is_hidden(&entry.file_name().to_string_lossy()) {
            saw_hidden = true;
        } else {
            return Ok(DirectoryState::ExistsNonEmptyVisible);
        }
    }

    Ok(if saw_hidden {
        DirectoryState::ExistsNonEmptyHiddenOnly
    } else {
        DirectoryState::ExistsEmpty
    })
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Remove every entry below `path`, hidden ones included, keeping `path` itself
async fn empty_dir(path: &Path) -> io::Result<()> {
    let mut entries = fs::read_dir(path).await?;
    let mut children: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        children.push(entry.path());
    }

    for child in children {
        let metadata = fs::symlink_metadata(&child).await?;
        if metadata.is_dir() {
            fs::remove_dir_all(&child).await?;
        } else {
            fs::remove_file(&child).await?;
        }
    }
    Ok(())
}

async fn probe_write_permission(path: &Path) -> io::Result<()> {
    let probe = path.join(WRITE_PROBE_FILE);
    fs::write(&probe, "test").await?;
    fs::remove_file(&probe).await
}

/// True only when `path` exists and is a directory
pub async fn directory_exists(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

/// True when `path` holds no visible entries. Unreadable or missing
/// directories count as empty.
pub async fn is_dir_empty(path: &Path) -> bool {
    !matches!(inspect(path).await, Ok(DirectoryState::ExistsNonEmptyVisible))
}
