use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BROKEN: &str = r#"tree broken
root a
question a "A?" options "x", "y"
rule only_x when a is "x" then recommend "X" "d"
"#;

const SMALL: &str = r#"tree small
root a
question a "A?" options "x"
rule r when a is any as v then recommend "Track {v}" "d"
"#;

#[test]
fn test_cli_help_lists_commands() {
    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("paths"))
        .stdout(predicate::str::contains("server"));
}

#[test]
fn test_cli_list_includes_builtin_and_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("small.tree"), SMALL).unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("list").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Workspace contains 1 files, 2 trees"))
        .stdout(predicate::str::contains("career_advisor: 22 questions, 40 rules"))
        .stdout(predicate::str::contains("small: 1 questions, 1 rules"));
}

#[test]
fn test_cli_show_tree() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("show")
        .arg("career_advisor")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Root: field_interest"))
        .stdout(predicate::str::contains("rec_network"));
}

#[test]
fn test_cli_show_missing_tree() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("show").arg("nope").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Tree 'nope' not found"));
}

#[test]
fn test_cli_check_reports_invalid_tree() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.tree"), BROKEN).unwrap();
    fs::write(temp_dir.path().join("small.tree"), SMALL).unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("check").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("failed"))
        .stdout(predicate::str::contains("2 file(s) checked, 1 failed"))
        .stderr(predicate::str::contains("no rule for option(s): y"));
}

#[test]
fn test_cli_check_valid_workspace() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("small.tree"), SMALL).unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("check").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) checked, 0 failed, 2 tree(s) valid"));
}

#[test]
fn test_cli_invalid_tree_fails_run() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.tree"), BROKEN).unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("career_advisor")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn test_cli_paths_filtered_by_track() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("paths")
        .arg("career_advisor")
        .arg("--track")
        .arg("network engineer")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Found 1 path(s)"))
        .stdout(predicate::str::contains("sys_focus = Network Engineering"));
}

#[test]
fn test_cli_paths_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("small.tree"), SMALL).unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("paths")
        .arg("small")
        .arg("--json")
        .arg("--dir")
        .arg(temp_dir.path());

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["recommendation"]["track"], "Track x");
    assert_eq!(json[0]["steps"][0]["answer"], "x");
}

#[test]
fn test_cli_list_counts_builtin_copy_once() {
    let temp_dir = TempDir::new().unwrap();
    let trees = temp_dir.path().join("waypoint").join("trees");
    fs::create_dir_all(&trees).unwrap();
    fs::write(
        trees.join("career.tree"),
        include_str!("../../../waypoint/trees/career.tree"),
    )
    .unwrap();
    fs::write(temp_dir.path().join("small.tree"), SMALL).unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("list").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Workspace contains 2 files, 2 trees"))
        .stdout(predicate::str::contains("career_advisor: 22 questions, 40 rules"));
}

#[test]
fn test_cli_check_accepts_builtin_copy() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("career.tree"),
        include_str!("../../../waypoint/trees/career.tree"),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("check").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("built-in"))
        .stdout(predicate::str::contains("1 file(s) checked, 0 failed"));
}
