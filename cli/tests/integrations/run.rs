use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PETS: &str = r#"
tree pets
root space

question space "How much space do you have?"
  options "Apartment", "House with garden"

rule ask_time
  when space is "Apartment"
  then ask time

rule rec_dog
  when space is "House with garden"
  then recommend "Dog" "Loyal and active."

question time "How much time per day?"
  options "Little", "Plenty"

rule rec_cat
  when time is any as amount
  then recommend "Cat ({amount} time)" "Independent companion."
"#;

fn workspace_with(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).unwrap();
    }
    temp_dir
}

#[test]
fn test_cli_run_builtin_to_recommendation() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("career_advisor")
        .arg("field_interest=Systems & Infrastructure")
        .arg("sys_focus=Network Engineering")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Recommended Track:"))
        .stdout(predicate::str::contains("Network Engineer (Cisco/Juniper)"));
}

#[test]
fn test_cli_run_stops_at_live_question() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("career_advisor")
        .arg("field_interest=Software Development")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(dev_platform)"))
        .stdout(predicate::str::contains("Embedded Systems"));
}

#[test]
fn test_cli_run_custom_tree() {
    let temp_dir = workspace_with(&[("pets.tree", PETS)]);

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("pets")
        .arg("space=Apartment")
        .arg("time=Plenty")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cat (Plenty time)"));
}

#[test]
fn test_cli_run_json_output() {
    let temp_dir = workspace_with(&[("pets.tree", PETS)]);

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("pets")
        .arg("space=House with garden")
        .arg("--json")
        .arg("--dir")
        .arg(temp_dir.path());

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["display"]["kind"], "recommendation");
    assert_eq!(json["display"]["track"], "Dog");
    assert_eq!(json["transcript"]["steps"][0]["question_id"], "space");
}

#[test]
fn test_cli_run_invalid_answer() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("career_advisor")
        .arg("field_interest=Nonexistent")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid answer"))
        .stderr(predicate::str::contains("Nonexistent"));
}

#[test]
fn test_cli_run_nonexistent_tree() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("nonexistent")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_run_malformed_answer() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("career_advisor")
        .arg("field_interest")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse answer"));
}

#[test]
fn test_cli_run_answers_without_tree_name() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("field_interest=Systems & Infrastructure")
        .arg("sys_focus=Network Engineering")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Network Engineer (Cisco/Juniper)"));
}

#[test]
fn test_cli_run_in_checkout_with_builtin_tree_file() {
    let temp_dir = workspace_with(&[(
        "career.tree",
        include_str!("../../../waypoint/trees/career.tree"),
    )]);

    let mut cmd = Command::cargo_bin("waypoint").unwrap();
    cmd.arg("run")
        .arg("field_interest=Data & AI")
        .arg("--dir")
        .arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(data_ai_focus)"));
}
