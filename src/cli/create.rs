use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cli::CommandError;
use crate::models::framework::Framework;
use crate::models::project::ValidationOptions;
use crate::services::directory_guard::DirectoryGuard;
use crate::services::env_generator::{Credentials, EnvGenerator};
use crate::services::lifecycle_guard::ProcessLifecycleGuard;
use crate::services::scaffolder::Scaffolder;
use crate::utils::error::CliError;
use crate::utils::logging::LogLevel;
use crate::utils::validation::validate_project_name;

/// Create a new project directory wired for Privy
#[derive(Debug, Clone)]
pub struct CreateCommand {
    pub name: String,
    pub framework: Framework,
    pub app_id: String,
    pub client_id: String,
    pub force: bool,
    pub dry_run: bool,
    pub skip_install: bool,
    pub json: bool,
    pub log_level: LogLevel,
}

/// JSON response format for the create command
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub status: String,
    pub project_name: String,
    pub project_path: String,
    pub framework: Framework,
    pub dry_run: bool,
    /// External commands run (or planned, under dry run)
    pub steps: Vec<String>,
    pub files: Vec<String>,
}

impl CreateCommand {
    /// Execute the create command
    pub async fn run(&self) -> Result<CreateResponse, CommandError> {
        info!("🔐 Welcome to Create Privy App!");
        validate_project_name(&self.name)?;

        let options = ValidationOptions::new(self.force, self.dry_run);
        let project = DirectoryGuard::new()?.validate(&self.name, options).await?;

        // A dry run never created anything, so there is nothing to clean up
        let tracked = if options.dry_run {
            None
        } else {
            Some(project.clone().into_path_buf())
        };
        let lifecycle = ProcessLifecycleGuard::install(tracked)?;

        let credentials = Credentials::new(self.app_id.clone(), self.client_id.clone());
        let generator = EnvGenerator::new(self.framework, credentials.clone());
        let scaffolder = (!self.skip_install).then(|| Scaffolder::new(self.framework));
        let steps: Vec<String> = scaffolder
            .iter()
            .flat_map(Scaffolder::plan)
            .map(|step| step.to_string())
            .collect();

        info!("Creating your {} project...", self.framework.display_name());
        let files: Vec<String> = if options.dry_run {
            for step in &steps {
                info!("[dry-run] Would run `{}` in {}", step, project);
            }
            generator
                .planned_files()
                .into_iter()
                .map(|file| {
                    let path = project.join(file);
                    info!("[dry-run] Would write {}", path.display());
                    path.display().to_string()
                })
                .collect()
        } else {
            let target = project.clone();
            let written = lifecycle
                .supervise(async move {
                    if let Some(scaffolder) = scaffolder {
                        scaffolder.run(&target).await?;
                    }
                    generator.generate(&target).await
                })
                .await?;
            written.iter().map(|path| path.display().to_string()).collect()
        };

        debug!("Generation finished for {}", project);

        let response = CreateResponse {
            status: if options.dry_run { "dry-run" } else { "success" }.to_string(),
            project_name: self.name.clone(),
            project_path: project.to_string(),
            framework: self.framework,
            dry_run: options.dry_run,
            steps,
            files,
        };

        if self.json {
            let json_output = serde_json::to_string_pretty(&response)
                .map_err(|e| CliError::new(format!("Failed to serialize JSON response: {}", e)))?;
            println!("{}", json_output);
        } else if self.log_level != LogLevel::Silent {
            self.print_next_steps(&credentials);
        }

        // Signals stay routed to cleanup until the report is out
        drop(lifecycle);
        Ok(response)
    }

    fn print_next_steps(&self, credentials: &Credentials) {
        if self.dry_run {
            println!("Dry run complete: no files were written for {}", self.name);
            return;
        }

        let env_file = self.framework.env_file();
        println!("Project created successfully!");
        println!();
        println!("🎉 Your Privy powered app is ready!");
        println!();
        println!("Next steps:");
        println!("  1. cd {}", self.name);
        if credentials.is_complete() {
            println!("  2. Start the dev server");
            println!();
            println!("✅ Your Privy credentials have been automatically configured!");
        } else {
            println!("  2. Update your Privy credentials in {}", env_file);
            println!("  3. Start the dev server");
            println!();
            println!("🔑 Don't forget to add your Privy App ID and Client ID to {}!", env_file);
            println!("   Get them from: https://dashboard.privy.io");
        }
    }
}
