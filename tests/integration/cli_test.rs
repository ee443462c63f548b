//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::fixture::ExportFixture;

#[test]
fn cli_reports_summary_counts() {
    let fixture = ExportFixture::new();
    fixture.followers(&[("ann", 100), ("bob", 200)]);
    let out = tempfile::tempdir().unwrap();

    Command::cargo_bin("ifa")
        .unwrap()
        .arg(fixture.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--no-xlsx")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total entries: 2"))
        .stdout(predicate::str::contains("Followers: 2"));

    assert!(out.path().join("followers_aggregated.jsonl").exists());
}

#[test]
fn cli_fails_on_missing_export() {
    let empty = tempfile::tempdir().unwrap();
    Command::cargo_bin("ifa")
        .unwrap()
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("connections"));
}

#[test]
fn cli_progress_flag_prints_milestones() {
    let fixture = ExportFixture::new();
    fixture.followers(&[("ann", 100)]);
    let out = tempfile::tempdir().unwrap();

    Command::cargo_bin("ifa")
        .unwrap()
        .arg(fixture.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--no-xlsx")
        .arg("--progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("[100%] Done"));
}

#[test]
fn cli_honors_custom_base_filename() {
    let fixture = ExportFixture::new();
    fixture.followers(&[("ann", 100)]);
    let out = tempfile::tempdir().unwrap();

    Command::cargo_bin("ifa")
        .unwrap()
        .arg(fixture.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--base-filename")
        .arg("contacts")
        .arg("--no-xlsx")
        .assert()
        .success();

    assert!(out.path().join("contacts.jsonl").exists());
}
