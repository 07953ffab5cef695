use anyhow::{bail, Context};
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::models::framework::Framework;
use crate::models::project::ProjectPath;

/// Package manager used for installs. Selection is not configurable.
pub const PACKAGE_MANAGER: &str = "pnpm";
pub const PRIVY_PACKAGE: &str = "@privy-io/react-auth";

/// One external command of a scaffolding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldStep {
    pub description: String,
    pub program: String,
    pub args: Vec<String>,
}

impl ScaffoldStep {
    pub fn new<I, S>(description: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ScaffoldStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs the framework's upstream scaffolder inside the validated project
/// directory, then adds the Privy SDK.
#[derive(Debug, Clone)]
pub struct Scaffolder {
    framework: Framework,
}

impl Scaffolder {
    pub fn new(framework: Framework) -> Self {
        Self { framework }
    }

    /// Commands in execution order. All run with the project directory as cwd.
    pub fn plan(&self) -> Vec<ScaffoldStep> {
        match self.framework {
            Framework::NextJs => vec![
                ScaffoldStep::new(
                    "Creating Next.js project",
                    "npx",
                    [
                        "create-next-app@latest",
                        ".",
                        "--use-pnpm",
                        "--yes",
                        "--typescript",
                        "--eslint",
                        "--tailwind",
                        "--no-src-dir",
                        "--app",
                        "--import-alias",
                        "@/*",
                    ],
                ),
                ScaffoldStep::new("Installing Privy dependencies", PACKAGE_MANAGER, ["add", PRIVY_PACKAGE]),
            ],
            Framework::Vite => vec![
                ScaffoldStep::new(
                    "Creating Vite project",
                    "npm",
                    ["create", "vite@latest", ".", "--", "--template", "react-ts"],
                ),
                ScaffoldStep::new("Installing dependencies", PACKAGE_MANAGER, ["install"]),
                ScaffoldStep::new("Installing Privy dependencies", PACKAGE_MANAGER, ["add", PRIVY_PACKAGE]),
            ],
        }
    }

    pub async fn run(&self, project: &ProjectPath) -> anyhow::Result<()> {
        for step in self.plan() {
            run_step(&step, project.as_path()).await?;
        }
        Ok(())
    }
}

/// Run one step to completion.
///
/// The child is killed if the returned future is dropped, so aborting the
/// supervised task never leaves an installer writing into a removed directory.
pub async fn run_step(step: &ScaffoldStep, cwd: &Path) -> anyhow::Result<()> {
    info!("{}...", step.description);
    debug!("Running `{}` in {}", step, cwd.display());

    let output = Command::new(&step.program)
        .args(&step.args)
        .current_dir(cwd)
        .env("npm_config_yes", "true")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("Failed to run {}", step.program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("`{}` failed ({}): {}", step, output.status, stderr.trim());
    }

    debug!("`{}` finished", step);
    Ok(())
}
