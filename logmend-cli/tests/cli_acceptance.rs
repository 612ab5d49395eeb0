//! Acceptance tests for the logmend binary
//!
//! Each test runs the real binary against a throwaway repository and log
//! file, with HOME/XDG directories redirected into the temp dir so no
//! state leaks onto the host.

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    repo: PathBuf,
    log: PathBuf,
    home: PathBuf,
}

impl CliTestEnv {
    fn new(log_content: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();

        let repo = base.join("repo");
        let calc_dir = repo.join("sample_app");
        fs::create_dir_all(&calc_dir).expect("failed to create repo");
        fs::write(
            calc_dir.join("calculator.py"),
            "def divide(a, b):\n    result = a / b\n    return result\n",
        )
        .expect("failed to write fixture source");

        let log = base.join("app.log");
        fs::write(&log, log_content).expect("failed to write log fixture");

        let home = base.join("home");
        fs::create_dir_all(&home).expect("failed to create HOME");

        Self {
            _temp_dir: temp_dir,
            repo,
            log,
            home,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("logmend").expect("binary should build");
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env("XDG_STATE_HOME", self.home.join(".local/state"))
            .arg("--log")
            .arg(&self.log)
            .arg("--repo")
            .arg(&self.repo);
        cmd
    }
}

const TRACEBACK_LOG: &str = "Traceback (most recent call last):\n  File \"sample_app/calculator.py\", line 2, in divide\nZeroDivisionError: division by zero\n";

#[test]
fn analyze_prints_finding_with_fix() {
    let env = CliTestEnv::new(TRACEBACK_LOG);

    let assert = env.command().assert().success();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("ZeroDivisionError"), "stdout:\n{stdout}");
    assert!(stdout.contains("calculator.py:2"), "stdout:\n{stdout}");
    assert!(stdout.contains("if b != 0:"), "stdout:\n{stdout}");
}

#[test]
fn json_output_is_parseable() {
    let env = CliTestEnv::new(TRACEBACK_LOG);

    let assert = env.command().arg("--format").arg("json").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);

    let report: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(report["status"], "completed");
    assert_eq!(report["findings"].as_array().unwrap().len(), 1);
}

#[test]
fn summary_counts_by_kind() {
    let env = CliTestEnv::new(
        "ZeroDivisionError: division by zero\nKeyError: 'email'\nKeyError: 'name'\n",
    );

    let assert = env.command().arg("--summary").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);

    assert!(stdout.contains("Errors found: 3"), "stdout:\n{stdout}");
    assert!(stdout.contains("KeyError"), "stdout:\n{stdout}");
}

#[test]
fn clean_log_reports_no_errors() {
    let env = CliTestEnv::new("all services healthy\n");

    let assert = env.command().assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("No known errors found"), "stdout:\n{stdout}");
}

#[test]
fn missing_log_file_fails() {
    let env = CliTestEnv::new("ignored");
    fs::remove_file(&env.log).unwrap();

    env.command().assert().failure();
}
