//! End-to-end tests of the `transcription-eval` binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const REFERENCE: &str = "\
0.100\t0.300\t220.000
0.300\t0.400\t246.942
0.500\t0.600\t277.183
0.550\t0.650\t293.665
";

const ESTIMATE: &str = "\
0.120\t0.290\t225.000
0.300\t0.340\t246.942
0.500\t0.600\t500.000
0.550\t0.600\t293.665
0.560\t0.650\t293.665
";

fn notes_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".txt").expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write notes");
    file.flush().expect("Failed to flush notes");
    file
}

fn cmd() -> Command {
    Command::cargo_bin("transcription-eval").expect("binary should build")
}

#[test]
fn test_evaluate_text_report() {
    let reference = notes_file(REFERENCE);
    let estimate = notes_file(ESTIMATE);

    cmd()
        .arg("evaluate")
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Precision:\t0.400000"))
        .stdout(predicate::str::contains("F-measure:\t0.444444"))
        .stdout(predicate::str::contains("Recall_no_offset:\t0.750000"));
}

#[test]
fn test_evaluate_json_report_and_output_file() {
    let reference = notes_file(REFERENCE);
    let estimate = notes_file(ESTIMATE);
    let output = NamedTempFile::with_suffix(".json").expect("Failed to create temp file");

    let assert = cmd()
        .args(["--format", "json", "evaluate"])
        .arg(reference.path())
        .arg(estimate.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success();

    let stdout: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("stdout should be JSON");
    assert!((stdout["Precision_no_offset"].as_f64().unwrap() - 0.6).abs() < 1e-12);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output.path()).unwrap()).unwrap();
    assert_eq!(saved, stdout);
}

#[test]
fn test_evaluate_empty_estimate_warns() {
    let reference = notes_file(REFERENCE);
    let estimate = notes_file("# nothing transcribed\n");

    cmd()
        .args(["--format", "tsv", "evaluate"])
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0.000000\t0.000000\t0.000000"))
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_evaluate_rejects_invalid_pitch() {
    let reference = notes_file("0.1\t0.3\t-220.0\n");
    let estimate = notes_file(ESTIMATE);

    cmd()
        .arg("evaluate")
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("strictly positive"));
}

#[test]
fn test_evaluate_rejects_malformed_row() {
    let reference = notes_file("0.1\t0.3\n");
    let estimate = notes_file(ESTIMATE);

    cmd()
        .arg("evaluate")
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 1"));
}

#[test]
fn test_match_pairs() {
    let reference = notes_file(REFERENCE);
    let estimate = notes_file(ESTIMATE);

    cmd()
        .args(["--format", "tsv", "match"])
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .success()
        .stdout("reference\testimate\n0\t0\n3\t3\n");

    cmd()
        .args(["--format", "tsv", "match", "--no-offset"])
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .success()
        .stdout("reference\testimate\n0\t0\n1\t1\n3\t3\n");
}

#[test]
fn test_match_strict_boundary() {
    let reference = notes_file("0.0\t1.0\t100.0\n");
    let estimate = notes_file("0.05\t1.0\t100.0\n");

    cmd()
        .args(["match", "--strict"])
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 matched notes"));
}

#[test]
fn test_match_rejects_invalid_notes() {
    let estimate = notes_file(ESTIMATE);

    let reference = notes_file("0.1\t0.3\t-220.0\n");
    cmd()
        .arg("match")
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("strictly positive"));

    let reference = notes_file("0.5\t0.3\t220.0\n");
    cmd()
        .arg("match")
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .failure();
}

#[test]
fn test_match_empty_reference_warns() {
    let reference = notes_file("");
    let estimate = notes_file(ESTIMATE);

    cmd()
        .arg("match")
        .arg(reference.path())
        .arg(estimate.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 matched notes"))
        .stderr(predicate::str::contains("empty"));
}
