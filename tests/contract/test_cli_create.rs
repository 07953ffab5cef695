// Contract test for the `create-privy-app` command

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Binary isolated from the caller's environment and user config.
/// External installers are skipped so runs stay offline.
fn create_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("create-privy-app").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("CREATE_PRIVY_APP_CONFIG", temp_dir.path().join("no-config.toml"))
        .env("CREATE_PRIVY_APP_SKIP_INSTALL", "true")
        .env_remove("PRIVY_APP_ID")
        .env_remove("PRIVY_CLIENT_ID")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_create_absent_directory() {
    let temp_dir = TempDir::new().unwrap();

    create_cmd(&temp_dir)
        .arg("my-app")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project created successfully!"))
        .stdout(predicate::str::contains("cd my-app"))
        .stdout(predicate::str::contains("Update your Privy credentials in .env.local"));

    let project = temp_dir.path().join("my-app");
    assert!(project.is_dir());
    assert!(!project.join(".write-test").exists());
    let env = fs::read_to_string(project.join(".env.local")).unwrap();
    assert!(env.contains("NEXT_PUBLIC_PRIVY_APP_ID=your_privy_app_id_here"));
}

#[test]
fn test_create_vite_with_credentials_from_env() {
    let temp_dir = TempDir::new().unwrap();

    create_cmd(&temp_dir)
        .args(["vite-app", "--framework", "vite"])
        .env("PRIVY_APP_ID", "app-123")
        .env("PRIVY_CLIENT_ID", "client-456")
        .assert()
        .success()
        .stdout(predicate::str::contains("automatically configured"));

    let env = fs::read_to_string(temp_dir.path().join("vite-app/.env")).unwrap();
    assert!(env.contains("VITE_PRIVY_APP_ID=app-123"));
    assert!(env.contains("VITE_PRIVY_CLIENT_ID=client-456"));
}

#[test]
fn test_create_refuses_non_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir_all(project.join(".git")).unwrap();
    fs::write(project.join("README.md"), "# keep me").unwrap();

    create_cmd(&temp_dir)
        .arg("my-app")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists and is not empty"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(project.join("README.md")).unwrap(), "# keep me");
    assert!(project.join(".git").is_dir());
}

#[test]
fn test_conflict_hints_survive_quiet_mode() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("index.html"), "<html></html>").unwrap();

    create_cmd(&temp_dir)
        .args(["my-app", "--quiet"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Use --force to overwrite the existing directory"))
        .stderr(predicate::str::contains("Choose a different project name"))
        .stderr(predicate::str::contains("Welcome").not());

    assert!(project.join("index.html").exists());
}

#[test]
fn test_create_force_overwrites_directory() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir_all(project.join(".git")).unwrap();
    fs::write(project.join("README.md"), "# old").unwrap();

    create_cmd(&temp_dir)
        .args(["my-app", "--force"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Using --force flag"));

    assert!(!project.join("README.md").exists());
    assert!(!project.join(".git").exists());
    assert!(project.join(".env.local").exists());
}

#[test]
fn test_create_refuses_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("my-app"), "plain file").unwrap();

    create_cmd(&temp_dir)
        .args(["my-app", "--force"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("A file with the name \"my-app\" already exists"));

    assert!(temp_dir.path().join("my-app").is_file());
}

#[test]
fn test_create_dry_run_touches_nothing() {
    let temp_dir = TempDir::new().unwrap();

    let output = create_cmd(&temp_dir)
        .args(["my-app", "--dry-run", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["status"], "dry-run");
    assert_eq!(response["dry_run"], true);
    assert_eq!(response["framework"], "nextjs");
    let project_path = response["project_path"].as_str().unwrap();
    assert!(std::path::Path::new(project_path).is_absolute());
    assert!(project_path.ends_with("my-app"));
    assert_eq!(response["files"].as_array().unwrap().len(), 3);
    assert!(response["steps"].as_array().unwrap().is_empty());

    assert!(!temp_dir.path().join("my-app").exists());
}

#[test]
fn test_create_dry_run_plans_install_steps() {
    let temp_dir = TempDir::new().unwrap();

    let output = create_cmd(&temp_dir)
        .env_remove("CREATE_PRIVY_APP_SKIP_INSTALL")
        .args(["my-app", "--dry-run", "--json", "--framework", "vite"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps: Vec<&str> = response["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step.as_str().unwrap())
        .collect();
    assert_eq!(
        steps,
        vec![
            "npm create vite@latest . -- --template react-ts",
            "pnpm install",
            "pnpm add @privy-io/react-auth",
        ]
    );
    assert!(!temp_dir.path().join("my-app").exists());
}

#[test]
fn test_create_json_output() {
    let temp_dir = TempDir::new().unwrap();

    let output = create_cmd(&temp_dir)
        .args(["json-app", "--json", "--framework", "vite"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["status"], "success");
    assert_eq!(response["project_name"], "json-app");
    assert_eq!(response["framework"], "vite");
}

#[test]
fn test_create_rejects_invalid_name() {
    let temp_dir = TempDir::new().unwrap();

    create_cmd(&temp_dir)
        .arg("my app")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot contain spaces"));

    assert!(!temp_dir.path().join("my app").exists());
}

#[test]
fn test_create_silent_mode() {
    let temp_dir = TempDir::new().unwrap();

    create_cmd(&temp_dir)
        .args(["quiet-app", "--silent"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert!(temp_dir.path().join("quiet-app").is_dir());
}

#[test]
fn test_create_uses_config_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "framework = \"vite\"\n").unwrap();

    create_cmd(&temp_dir)
        .arg("configured-app")
        .env("CREATE_PRIVY_APP_CONFIG", &config_path)
        .assert()
        .success();

    assert!(temp_dir.path().join("configured-app/.env").exists());
    assert!(!temp_dir.path().join("configured-app/.env.local").exists());
}

#[test]
fn test_create_rejects_malformed_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "framework = [").unwrap();

    create_cmd(&temp_dir)
        .arg("my-app")
        .env("CREATE_PRIVY_APP_CONFIG", &config_path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration"));

    assert!(!temp_dir.path().join("my-app").exists());
}
