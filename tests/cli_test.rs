//! Integration tests for the `wfst-decode` CLI binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn decode_subcommand_prints_output_labels() {
    let fst = write_temp("0 1 1 7 0.0\n1 0.0\n");
    let script = write_temp("[[0.0, -10.0], [-10.0, 0.0]]");

    Command::cargo_bin("wfst-decode")
        .unwrap()
        .args([
            "decode",
            "--fst",
            fst.path().to_str().unwrap(),
            "--sos",
            "0",
            "--eos",
            "1",
            "--script",
            script.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));
}

#[test]
fn decode_subcommand_reports_failure_without_a_completed_hypothesis() {
    let fst = write_temp("0 1 1 7 0.0\n");
    let script = write_temp("[[0.0, -10.0]]");

    Command::cargo_bin("wfst-decode")
        .unwrap()
        .args([
            "decode",
            "--fst",
            fst.path().to_str().unwrap(),
            "--sos",
            "0",
            "--eos",
            "1",
            "--script",
            script.path().to_str().unwrap(),
        ])
        .assert()
        .failure();
}

#[test]
fn validate_subcommand_reports_graph_structure() {
    let fst = write_temp("0 1 1 7 0.0\n0 2 2 8 0.5\n1 0.0\n2 0.0\n");

    Command::cargo_bin("wfst-decode")
        .unwrap()
        .args(["validate", "--fst", fst.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("states: 3"))
        .stdout(predicate::str::contains("arcs: 2"))
        .stdout(predicate::str::contains("final states: 2"));
}

#[test]
fn validate_subcommand_on_invalid_graph_fails() {
    let fst = write_temp("garbage data with too many fields here ok\n");

    Command::cargo_bin("wfst-decode")
        .unwrap()
        .args(["validate", "--fst", fst.path().to_str().unwrap()])
        .assert()
        .failure();
}
