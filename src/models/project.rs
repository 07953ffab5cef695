use std::path::{Path, PathBuf};

/// Flags that govern how an existing target directory is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidationOptions {
    /// Allow clearing a non-empty directory
    pub force: bool,
    /// Report what would happen without touching the filesystem
    pub dry_run: bool,
}

impl ValidationOptions {
    pub fn new(force: bool, dry_run: bool) -> Self {
        Self { force, dry_run }
    }
}

/// What currently sits at the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryState {
    Absent,
    ExistsEmpty,
    /// At least one entry whose name does not start with `.`
    ExistsNonEmptyVisible,
    /// Only dot-entries such as `.git` or `.gitignore`
    ExistsNonEmptyHiddenOnly,
    ExistsAsFile,
}

/// Absolute path of the project being generated.
///
/// Only [`crate::services::directory_guard::DirectoryGuard`] hands these out;
/// every later write goes through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectPath(PathBuf);

impl ProjectPath {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn join<P: AsRef<Path>>(&self, child: P) -> PathBuf {
        self.0.join(child)
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl From<ProjectPath> for PathBuf {
    fn from(path: ProjectPath) -> Self {
        path.0
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
