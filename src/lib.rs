// create-privy-app
// Core library functionality

pub mod cli;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use models::project::{DirectoryState, ProjectPath, ValidationOptions};
pub use services::cleanup::{CleanupAction, CleanupHandle};
pub use services::directory_guard::DirectoryGuard;
pub use services::lifecycle_guard::{Fault, FaultKind, ProcessLifecycleGuard, ShutdownSignal};
pub use services::scaffolder::{ScaffoldStep, Scaffolder};
pub use utils::error::CliError;
