use std::path::{Component, Path, PathBuf};
use crate::utils::error::Result;

/// Resolves user-supplied project names to absolute paths
#[derive(Debug, Clone)]
pub struct PathResolver {
    base: PathBuf,
}

impl PathResolver {
    /// Resolve against the process's current working directory
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self {
            base: std::env::current_dir()?,
        })
    }

    /// Resolve against an explicit base directory
    pub fn with_base<P: Into<PathBuf>>(base: P) -> Self {
        Self { base: base.into() }
    }

    /// Join `name` onto the base and normalize `.` and `..` lexically.
    ///
    /// An absolute `name` replaces the base. No filesystem access happens,
    /// so the result depends only on `(base, name)`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        normalize(&self.base.join(name))
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root, matching `/..` == `/`
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
