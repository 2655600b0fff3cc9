use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// `filewise` isolated from any user or project configuration
fn filewise(workspace: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("filewise").unwrap();
    cmd.current_dir(workspace.path())
        .env("XDG_CONFIG_HOME", workspace.path().join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn touch(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn json_names(output: &[u8]) -> Vec<String> {
    let paths: Vec<String> = serde_json::from_slice(output).unwrap();
    paths
        .iter()
        .map(|p| {
            Path::new(p)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string()
        })
        .collect()
}

fn sample_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("tree");
    touch(&root, "data_2020.nc", "");
    touch(&root, "data_2021.nc", "");
    touch(&root, "notes.txt", "");
    touch(&root, "sub/keep.txt", "");
    touch(&root, "sub/exclude_me/keep2.txt", "");
    touch(&root, "reports/final_report.pdf", "");
    temp_dir
}

#[test]
fn test_find_prunes_excluded_directories() {
    let workspace = sample_tree();

    let output = filewise(&workspace)
        .args(["find", "tree", "-p", "keep", "-x", "exclude_me", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(json_names(&output.stdout), vec!["keep.txt"]);
}

#[test]
fn test_find_with_extension_only() {
    let workspace = sample_tree();

    filewise(&workspace)
        .args(["find", "tree", "-e", ".txt", "-x", "exclude_me"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt"))
        .stdout(predicate::str::contains("keep.txt"))
        .stdout(predicate::str::contains("keep2.txt").not())
        .stdout(predicate::str::contains("data_2020.nc").not());
}

#[test]
fn test_find_prefix_pattern() {
    let workspace = sample_tree();

    let output = filewise(&workspace)
        .args(["find", "tree", "-p", "data*", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        json_names(&output.stdout),
        vec!["data_2020.nc", "data_2021.nc"]
    );
}

#[test]
fn test_find_lone_wildcard_lists_everything() {
    let workspace = sample_tree();

    let output = filewise(&workspace)
        .args(["find", "tree", "-p", "*", "-x", "*", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        json_names(&output.stdout),
        vec!["data_2020.nc", "data_2021.nc", "notes.txt"]
    );
}

#[test]
fn test_dirs_containing_matches() {
    let workspace = sample_tree();

    let output = filewise(&workspace)
        .args(["dirs", "tree", "--containing", "-e", "pdf", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(json_names(&output.stdout), vec!["reports"]);
}

#[test]
fn test_extensions_listing() {
    let workspace = sample_tree();

    let output = filewise(&workspace)
        .args(["extensions", "tree", "--skip-ext", "nc", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let extensions: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(extensions, vec![".pdf", ".txt"]);
}

#[test]
fn test_missing_root_fails() {
    let workspace = TempDir::new().unwrap();

    filewise(&workspace)
        .args(["find", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_rename_dry_run_leaves_files() {
    let workspace = TempDir::new().unwrap();
    touch(workspace.path(), "photos/a.jpeg", "a");
    touch(workspace.path(), "photos/b.jpeg", "b");

    let output = filewise(&workspace)
        .args([
            "rename", "photos", "-p", "*.jpeg", "--replace", ".jpeg", ".jpg", "--dry-run",
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["dry_run"], true);
    assert_eq!(document["steps"].as_array().unwrap().len(), 2);
    assert!(workspace.path().join("photos/a.jpeg").exists());
    assert!(!workspace.path().join("photos/a.jpg").exists());
}

#[test]
fn test_rename_disambiguates_batch_collisions() {
    let workspace = TempDir::new().unwrap();
    touch(workspace.path(), "dir/cq.md", "first");
    touch(workspace.path(), "dir/qc.md", "second");

    filewise(&workspace)
        .args(["rename", "dir", "-p", "q", "--replace", "q", ""])
        .assert()
        .success();

    let dir = workspace.path().join("dir");
    assert_eq!(fs::read_to_string(dir.join("c.md")).unwrap(), "first");
    assert_eq!(fs::read_to_string(dir.join("c_1.md")).unwrap(), "second");
    assert!(!dir.join("cq.md").exists());
    assert!(!dir.join("qc.md").exists());
}

#[test]
fn test_rename_sequence() {
    let workspace = TempDir::new().unwrap();
    touch(workspace.path(), "scans/z.png", "z");
    touch(workspace.path(), "scans/a.png", "a");

    filewise(&workspace)
        .args(["rename", "scans", "--sequence", "page_", "--width", "2"])
        .assert()
        .success();

    let dir = workspace.path().join("scans");
    assert_eq!(fs::read_to_string(dir.join("page_01.png")).unwrap(), "a");
    assert_eq!(fs::read_to_string(dir.join("page_02.png")).unwrap(), "z");
}

#[test]
fn test_rename_refuses_external_collision() {
    let workspace = TempDir::new().unwrap();
    touch(workspace.path(), "dir/c1.txt", "new");
    touch(workspace.path(), "dir/c.txt", "old");

    filewise(&workspace)
        .args(["rename", "dir", "-p", "c1", "--replace", "1", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(workspace.path().join("dir/c.txt")).unwrap(),
        "old"
    );

    filewise(&workspace)
        .args(["rename", "dir", "-p", "c1", "--replace", "1", "", "--overwrite"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(workspace.path().join("dir/c.txt")).unwrap(),
        "new"
    );
    assert!(!workspace.path().join("dir/c1.txt").exists());
}

#[test]
fn test_rename_requires_a_rule() {
    let workspace = TempDir::new().unwrap();

    filewise(&workspace)
        .args(["rename", "."])
        .assert()
        .failure();
}

#[test]
fn test_config_file_defaults() {
    let workspace = sample_tree();
    fs::write(
        workspace.path().join("filewise.json"),
        r#"{ "search": { "root": "tree", "exclude_dirs": ["exclude_me"] } }"#,
    )
    .unwrap();

    let output = filewise(&workspace)
        .args(["find", "-p", "keep", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(json_names(&output.stdout), vec!["keep.txt"]);
}

#[test]
fn test_explicit_config_override() {
    let workspace = sample_tree();
    let config = workspace.path().join("custom.json");
    fs::write(&config, r#"{ "search": { "skip_extensions": ["nc", "pdf"] } }"#).unwrap();

    let output = filewise(&workspace)
        .args(["extensions", "tree", "--json", "--config"])
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success());
    let extensions: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(extensions, vec![".txt"]);
}
