use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const FAMILY: &str = r#"
groups:
  - id: rivera
    members:
      - { id: ana, name: Ana, role: parent }
      - { id: ben, name: Ben, role: parent }
      - { id: cam, name: Cam, role: child, age: 9 }
    tasks:
      - { id: t1, title: Pack lunches, assignee: ana, creator: ana, effort: 2, recurring: true }
      - { id: t2, title: Book dentist, assignee: ana, creator: ana, effort: 1 }
      - { id: t3, title: Renew permits, assignee: ana, creator: ana, effort: 3, complexity: high }
      - { id: t4, title: Mow lawn, assignee: ben, creator: ana, effort: 2 }
    events:
      - title: Parent teacher night
        organizer: ana
        attendees: [ben]
        date: 2026-10-20T18:00:00Z
    habits:
      - { name: Reading, creator: ana, participants: [cam] }
"#;

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("family.yaml"), FAMILY).unwrap();
    dir
}

fn loadbalance(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("loadbalance").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn schema_prints_config_schema() {
    let dir = tempfile::tempdir().unwrap();
    loadbalance(dir.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadline_ms"))
        .stdout(predicate::str::contains("calibration"));
}

#[test]
fn analyze_writes_reports_and_snapshot() {
    let dir = workspace();
    loadbalance(dir.path())
        .args([
            "analyze",
            "--group",
            "rivera",
            "--data",
            "family.yaml",
            "--from",
            "2026-10-18",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Primary carrier: Ana"))
        .stdout(predicate::str::contains("Ana is carrying"));

    let dated: Vec<_> = fs::read_dir(dir.path().join("reports"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(dated.len(), 1);
    assert!(dated[0].join("rivera.md").exists());
    assert!(dated[0].join("rivera.analysis.json").exists());

    let snapshots = fs::read_dir(dir.path().join(".loadbalance/snapshots/rivera"))
        .unwrap()
        .count();
    assert_eq!(snapshots, 1);

    loadbalance(dir.path())
        .args(["history", "--group", "rivera"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# History: rivera"))
        .stdout(predicate::str::contains("| Ana |"));
}

#[test]
fn analyze_without_snapshot() {
    let dir = workspace();
    loadbalance(dir.path())
        .args([
            "analyze",
            "--group",
            "rivera",
            "--data",
            "family.yaml",
            "--no-snapshot",
        ])
        .assert()
        .success();

    assert!(!dir.path().join(".loadbalance").exists());
}

#[test]
fn analyze_unknown_group_fails() {
    let dir = workspace();
    loadbalance(dir.path())
        .args(["analyze", "--group", "nobody", "--data", "family.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nobody"));
}

#[test]
fn analyze_rejects_invalid_config() {
    let dir = workspace();
    fs::write(dir.path().join("loadbalance.yaml"), "deadline_ms: 0\n").unwrap();
    loadbalance(dir.path())
        .args(["analyze", "--group", "rivera", "--data", "family.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deadline_ms"));
}

#[test]
fn history_is_empty_for_new_group() {
    let dir = tempfile::tempdir().unwrap();
    loadbalance(dir.path())
        .args(["history", "--group", "rivera"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*No snapshots*"));
}
