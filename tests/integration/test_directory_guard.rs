use create_privy_app::services::path_resolver::PathResolver;
use create_privy_app::{CliError, DirectoryGuard, ValidationOptions};
use std::fs;
use tempfile::TempDir;

/// Integration tests for target directory validation
/// Covers the create / conflict / force / dry-run scenarios end to end

fn guard_in(temp_dir: &TempDir) -> DirectoryGuard {
    DirectoryGuard::with_resolver(PathResolver::with_base(temp_dir.path()))
}

fn entries(path: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_absent_target_is_created() {
    let temp_dir = TempDir::new().unwrap();

    let path = guard_in(&temp_dir)
        .validate("my-app", ValidationOptions::new(false, false))
        .await
        .unwrap();

    assert!(path.as_path().is_absolute());
    assert_eq!(path.as_path(), temp_dir.path().join("my-app"));
    assert!(path.as_path().is_dir());
    // The permission probe leaves nothing behind
    assert!(entries(path.as_path()).is_empty());
    // Exactly the target directory was created
    assert_eq!(entries(temp_dir.path()), vec!["my-app".to_string()]);
}

#[tokio::test]
async fn test_conflict_without_force_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir_all(project.join(".git")).unwrap();
    fs::write(project.join("README.md"), "# my app").unwrap();

    let result = guard_in(&temp_dir)
        .validate("my-app", ValidationOptions::new(false, false))
        .await;

    match result {
        Err(CliError::DirectoryConflict { path, message }) => {
            assert_eq!(path, project);
            assert_eq!(message, "Directory already exists");
        }
        other => panic!("Expected DirectoryConflict, got {:?}", other),
    }
    assert_eq!(entries(&project), vec![".git".to_string(), "README.md".to_string()]);
    assert_eq!(fs::read_to_string(project.join("README.md")).unwrap(), "# my app");
}

#[tokio::test]
async fn test_conflict_with_force_empties_directory() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir_all(project.join(".git/refs")).unwrap();
    fs::write(project.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
    fs::write(project.join("README.md"), "# my app").unwrap();

    let path = guard_in(&temp_dir)
        .validate("my-app", ValidationOptions::new(true, false))
        .await
        .unwrap();

    assert_eq!(path.as_path(), project);
    assert!(project.is_dir());
    assert!(entries(&project).is_empty());
}

#[tokio::test]
async fn test_hidden_only_directory_proceeds_without_clearing() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir_all(project.join(".git")).unwrap();
    fs::write(project.join(".gitignore"), "node_modules\n").unwrap();

    for force in [false, true] {
        guard_in(&temp_dir)
            .validate("my-app", ValidationOptions::new(force, false))
            .await
            .unwrap();
        assert_eq!(entries(&project), vec![".git".to_string(), ".gitignore".to_string()]);
    }
}

#[tokio::test]
async fn test_empty_directory_is_reused() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir(&project).unwrap();

    let path = guard_in(&temp_dir)
        .validate("my-app", ValidationOptions::default())
        .await
        .unwrap();

    assert_eq!(path.as_path(), project);
    assert!(entries(&project).is_empty());
}

#[tokio::test]
async fn test_dry_run_on_absent_target() {
    let temp_dir = TempDir::new().unwrap();

    let path = guard_in(&temp_dir)
        .validate("my-app", ValidationOptions::new(false, true))
        .await
        .unwrap();

    assert!(path.as_path().is_absolute());
    assert_eq!(path.as_path(), temp_dir.path().join("my-app"));
    assert!(!path.as_path().exists());
    assert!(entries(temp_dir.path()).is_empty());
}

#[tokio::test]
async fn test_dry_run_still_reports_conflicts() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("my-app");
    fs::create_dir(&project).unwrap();
    fs::write(project.join("index.html"), "<html></html>").unwrap();

    let err = guard_in(&temp_dir)
        .validate("my-app", ValidationOptions::new(false, true))
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::DirectoryConflict { .. }));
    assert!(project.join("index.html").exists());
}

#[tokio::test]
async fn test_nested_name_creates_parents() {
    let temp_dir = TempDir::new().unwrap();

    let path = guard_in(&temp_dir)
        .validate("apps/web/../my-app", ValidationOptions::default())
        .await
        .unwrap();

    assert_eq!(path.as_path(), temp_dir.path().join("apps/my-app"));
    assert!(path.as_path().is_dir());
}
