//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "cdp-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Construction Delay Predictor"),
        "Should show app name"
    );
    assert!(stdout.contains("generate"), "Should show generate command");
    assert!(stdout.contains("train"), "Should show train command");
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("model"), "Should show model command");
    assert!(stdout.contains("health"), "Should show health command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "cdp-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("cdp"), "Should show binary name");
}

/// Test generate subcommand help
#[test]
fn test_generate_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "cdp-cli", "--", "generate", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Generate help should succeed");
    assert!(stdout.contains("--count"), "Should show count option");
    assert!(stdout.contains("--seed"), "Should show seed option");
    assert!(stdout.contains("--output"), "Should show output option");
}

/// Test train subcommand help
#[test]
fn test_train_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "cdp-cli", "--", "train", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Train help should succeed");
    assert!(stdout.contains("--dataset"), "Should show dataset option");
    assert!(stdout.contains("--output"), "Should show output option");
}

/// End-to-end: generate a small dataset, then train a model from it
#[test]
fn test_generate_then_train_locally() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dataset = dir.path().join("dataset.csv");
    let model = dir.path().join("model.json");

    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "cdp-cli",
            "--",
            "generate",
            "--count",
            "60",
            "--seed",
            "7",
            "--output",
        ])
        .arg(&dataset)
        .output()
        .expect("Failed to execute generate");
    assert!(output.status.success(), "generate should succeed");
    assert!(dataset.exists(), "dataset CSV should be written");

    let output = Command::new("cargo")
        .args(["run", "-p", "cdp-cli", "--", "train", "--dataset"])
        .arg(&dataset)
        .arg("--output")
        .arg(&model)
        .output()
        .expect("Failed to execute train");
    assert!(output.status.success(), "train should succeed");
    assert!(model.exists(), "model artifact should be written");
}
