// Common validation utilities for create-privy-app

use crate::utils::error::{CliError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn project_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("static pattern is valid"))
}

/// Validate the project name typed on the command line.
///
/// The name doubles as the directory name and the npm package name, so it is
/// restricted to letters, digits, hyphens and underscores.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CliError::new("Project name cannot be empty"));
    }

    if name.contains(' ') {
        return Err(CliError::new(
            format!("Invalid project name '{}' - cannot contain spaces.\n\nValid project names:\n  ✓ my-app\n  ✓ my_app\n  ✗ my app", name)
        ));
    }

    if !project_name_pattern().is_match(name) {
        return Err(CliError::new(
            format!("Invalid project name '{}' - can only contain letters, numbers, hyphens, and underscores.", name)
        ));
    }

    if name.starts_with('-') || name.starts_with('_') {
        return Err(CliError::new(
            format!("Invalid project name '{}' - cannot start with a hyphen or underscore.", name)
        ));
    }

    Ok(())
}
