use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use crate::models::framework::Framework;
use crate::models::project::ProjectPath;

const APP_ID_PLACEHOLDER: &str = "your_privy_app_id_here";
const CLIENT_ID_PLACEHOLDER: &str = "your_privy_client_id_here";
const GITIGNORE_BLOCK: &str = "\n# Environment variables\n.env\n.env.local\n";

/// Privy credentials typed by the user; either may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub client_id: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            client_id: client_id.into(),
        }
    }

    /// Both values present, so no follow-up edit of the env file is needed
    pub fn is_complete(&self) -> bool {
        !self.app_id.trim().is_empty() && !self.client_id.trim().is_empty()
    }
}

/// Writes the authentication wiring of a generated project: the env file,
/// its `.env.example` twin and the `.gitignore` entries that keep secrets out
/// of version control.
#[derive(Debug, Clone)]
pub struct EnvGenerator {
    framework: Framework,
    credentials: Credentials,
}

impl EnvGenerator {
    pub fn new(framework: Framework, credentials: Credentials) -> Self {
        Self { framework, credentials }
    }

    /// Files this generator touches, relative to the project root
    pub fn planned_files(&self) -> Vec<&'static str> {
        vec![self.framework.env_file(), ".env.example", ".gitignore"]
    }

    /// Render the env file body with the given values
    pub fn render_env(&self, app_id: &str, client_id: &str) -> String {
        let prefix = self.framework.env_prefix();
        format!(
            "# Privy Configuration\n# Get these values from your Privy dashboard: https://dashboard.privy.io\n{prefix}APP_ID={app_id}\n{prefix}CLIENT_ID={client_id}\n"
        )
    }

    /// Write every planned file below `project`. Returns the written paths.
    pub async fn generate(&self, project: &ProjectPath) -> anyhow::Result<Vec<PathBuf>> {
        let app_id = non_empty_or(&self.credentials.app_id, APP_ID_PLACEHOLDER);
        let client_id = non_empty_or(&self.credentials.client_id, CLIENT_ID_PLACEHOLDER);

        info!("Setting up Privy integration...");
        let mut written = Vec::new();

        let env_path = project.join(self.framework.env_file());
        fs::write(&env_path, self.render_env(app_id, client_id)).await?;
        debug!("Wrote {}", env_path.display());
        written.push(env_path);

        let example_path = project.join(".env.example");
        fs::write(&example_path, self.render_env(APP_ID_PLACEHOLDER, CLIENT_ID_PLACEHOLDER)).await?;
        debug!("Wrote {}", example_path.display());
        written.push(example_path);

        let gitignore_path = project.join(".gitignore");
        if ensure_gitignore(&gitignore_path).await? {
            debug!("Updated {}", gitignore_path.display());
        }
        written.push(gitignore_path);

        Ok(written)
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Make sure `.env` files are ignored. Returns whether the file changed.
async fn ensure_gitignore(path: &std::path::Path) -> std::io::Result<bool> {
    let existing = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    if existing.lines().any(|line| line.trim().starts_with(".env")) {
        return Ok(false);
    }

    let mut content = existing;
    content.push_str(GITIGNORE_BLOCK);
    fs::write(path, content).await?;
    Ok(true)
}
