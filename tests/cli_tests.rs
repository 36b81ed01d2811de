//! Integration tests for the bootsig command line
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

use predicates::prelude::*;
use std::io::Write;

const LEVELS_CSV: &str = "tests/fixtures/readability_levels.csv";
const SCORES_JSON: &str = "tests/fixtures/readability_scores.json";
const TIED_JSON: &str = "tests/fixtures/tied.json";
const PADDED_CSV: &str = "tests/fixtures/padded_levels.csv";
const MIXED_JSON: &str = "tests/fixtures/mixed_labels.json";

fn json_report(args: &[&str]) -> serde_json::Value {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    let output = cmd.args(args).args(["--format", "json"]).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--metric"));
}

#[test]
fn test_cli_requires_input_and_metric() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_accuracy_text_report() {
    // A labels every row correctly, B only a third of them
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-i", LEVELS_CSV, "-m", "accuracy", "-n", "2000", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Metric: accuracy"))
        .stdout(predicate::str::contains("MODEL A SIGNIFICANTLY BETTER"))
        .stdout(predicate::str::contains("p-value: 0.000000"));
}

#[test]
fn test_f1_macro_json_report() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    let output = cmd
        .args([
            "-i", LEVELS_CSV, "-m", "f1-macro", "-n", "2000", "--seed", "1", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["metric"], "f1-macro");
    assert_eq!(json["resamples"], 2000);
    assert_eq!(json["sample_size"], 12);
    assert_eq!(json["score_a"], 1.0);
    assert_eq!(json["verdict"], "a_significantly_better");
}

#[test]
fn test_pearson_json_report() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    let output = cmd
        .args([
            "-i", SCORES_JSON, "-m", "pearson", "-n", "2000", "--seed", "3", "--format", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let p = json["p_value"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
    assert!(json["score_a"].as_f64().unwrap() > json["score_b"].as_f64().unwrap());
}

#[test]
fn test_tied_predictions_not_significant() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-i", TIED_JSON, "-m", "accuracy", "-n", "1000", "--seed", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p-value: 0.000000"))
        .stdout(predicate::str::contains("NO SIGNIFICANT ADVANTAGE"));
}

#[test]
fn test_parallel_workers_reproducible() {
    let run = || {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
        let output = cmd
            .args([
                "-i", SCORES_JSON, "-m", "spearman", "-n", "4000", "--seed", "9", "-w", "3",
                "--format", "json",
            ])
            .output()
            .unwrap();
        assert!(output.status.success());
        output.stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_config_file_with_override() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "resamples = 1500\nseed = 4\nsignificance_level = 0.01").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    let output = cmd
        .args(["-i", LEVELS_CSV, "-m", "accuracy", "-n", "1200", "--format", "json"])
        .arg("--config")
        .arg(config.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["resamples"], 1200);
    assert_eq!(json["significance_level"], 0.01);
}

#[test]
fn test_invalid_config_file_fails() {
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "workers = 0").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-i", LEVELS_CSV, "-m", "accuracy"])
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers must be >= 1"));
}

#[test]
fn test_zero_resamples_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-i", LEVELS_CSV, "-m", "accuracy", "-n", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("resamples must be >= 1"));
}

#[test]
fn test_numeric_metric_on_labels_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-i", LEVELS_CSV, "-m", "r2", "-n", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid number"));
}

#[test]
fn test_misaligned_input_fails() {
    let mut input = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    writeln!(
        input,
        r#"{{"y_true": [1, 0, 1], "pred_a": [1, 0], "pred_b": [0, 0, 1]}}"#
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-m", "accuracy", "-n", "100"])
        .arg("-i")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("length mismatch"));
}

#[test]
fn test_undefined_metric_reports_stage() {
    // Constant ground truth makes Pearson undefined on the full data
    let mut input = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(input, "y_true,pred_a,pred_b\n1,1,2\n1,2,1\n1,3,3").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-m", "pearson", "-n", "100"])
        .arg("-i")
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("observed data"));
}

#[test]
fn test_unknown_extension_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-i", "predictions.txt", "-m", "accuracy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected .json or .csv"));
}

#[test]
fn test_padded_and_multiline_csv_fields() {
    // Spaces after commas and a quoted label spanning two lines; A matches every row
    let json = json_report(&["-i", PADDED_CSV, "-m", "accuracy", "-n", "500", "--seed", "2"]);
    assert_eq!(json["sample_size"], 8);
    assert_eq!(json["score_a"], 1.0);
}

#[test]
fn test_mixed_integer_and_float_labels() {
    // y_true written as 1, pred_a as 1.0: the same label
    let json = json_report(&["-i", MIXED_JSON, "-m", "accuracy", "-n", "500", "--seed", "2"]);
    assert_eq!(json["score_a"], 1.0);
    assert_eq!(json["score_b"], 0.25);
}

#[test]
fn test_report_includes_seed() {
    let json = json_report(&["-i", LEVELS_CSV, "-m", "accuracy", "-n", "500", "--seed", "31"]);
    assert_eq!(json["seed"], 31);

    // An unseeded run still reports the seed it drew
    let json = json_report(&["-i", LEVELS_CSV, "-m", "accuracy", "-n", "500"]);
    assert!(json["seed"].is_u64());
}

#[test]
fn test_classification_summary_text() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bootsig");
    cmd.args(["-i", LEVELS_CSV, "-m", "f1-macro", "-n", "500", "--seed", "1", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Model A:"))
        .stdout(predicate::str::contains("Model B:"))
        .stdout(predicate::str::contains("confusion matrix:"))
        .stdout(predicate::str::contains("accuracy: 1.000000"));
}

#[test]
fn test_regression_summary_json() {
    let json = json_report(&[
        "-i", SCORES_JSON, "-m", "r2", "-n", "500", "--seed", "1", "--summary",
    ]);
    let model_a = &json["summary"]["model_a"];
    assert!(model_a["r2"].as_f64().unwrap() > 0.9);
    assert!(model_a["pearson"].as_f64().unwrap() > 0.9);
    assert!(json["summary"]["model_b"]["spearman"].is_number());
}

#[test]
fn test_summary_absent_by_default() {
    let json = json_report(&["-i", SCORES_JSON, "-m", "pearson", "-n", "500", "--seed", "1"]);
    assert!(json.get("summary").is_none());
}
