//! Integration tests for `provdeps dedup`.

use assert_cmd::Command;
use predicates::prelude::*;
use provdeps::test_utils::StatusFixture;
use serde_json::{Value, json};
use tempfile::TempDir;

fn provdeps(temp: &TempDir) -> Command {
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "[output]\npretty = false\n").unwrap();

    let mut cmd = Command::cargo_bin("provdeps").unwrap();
    cmd.env("PROVDEPS_CONFIG", config).env_remove("RUST_LOG").env("HOME", temp.path());
    cmd
}

/// An unnamed duplicate of a "task" entry is suppressed, and so is a categorized
/// duplicate of a plain entry
#[test]
fn test_dedup_file() {
    let temp = TempDir::new().unwrap();
    let path = StatusFixture::descriptors_json().write_to(temp.path()).unwrap();

    let output = provdeps(&temp).arg("dedup").arg(&path).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let doc: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        doc,
        json!({"resolvedDependencies": [
            {"name": "task", "uri": "a", "digest": {"sha256": "x"}},
            {"uri": "b", "digest": {"sha256": "y"}}
        ]})
    );
}

#[test]
fn test_dedup_keeps_late_protected_entry() {
    let temp = TempDir::new().unwrap();
    let input = r#"
resolvedDependencies:
  - uri: a
    digest: {sha256: x}
  - name: pipeline
    uri: a
    digest: {sha256: x}
"#;

    provdeps(&temp)
        .args(["dedup", "-"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"[{"uri":"a","digest":{"sha256":"x"}},{"name":"pipeline","uri":"a","digest":{"sha256":"x"}}]"#,
        ));
}

#[test]
fn test_dedup_rejects_garbage() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deps.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    provdeps(&temp)
        .arg("dedup")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse input document"));
}
