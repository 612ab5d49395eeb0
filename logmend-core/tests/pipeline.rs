//! End-to-end tests for the logmend analysis pipeline
//!
//! These tests build small throwaway repositories with `TempDir` fixtures
//! and run the full classify → extract → locate → synthesize flow.

use logmend_core::pipeline::{Analyzer, RunStore};
use logmend_core::types::{ErrorKind, ErrorRecord, RunStatus};
use logmend_core::{classify, locate, Config};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A calculator module with the division on line 26.
const CALCULATOR_PY: &str = r#""""
Sample calculator module
"""


class Calculator:
    def __init__(self):
        self.history = []

    def add(self, a, b):
        total = a + b
        self.history.append(total)
        return total

    def subtract(self, a, b):
        total = a - b
        self.history.append(total)
        return total

    def multiply(self, a, b):
        total = a * b
        self.history.append(total)
        return total

    def divide(self, a, b):
        result = a / b
        self.history.append(result)
        return result
"#;

const USER_SERVICE_PY: &str = r#"def load_user(data):
    email = data['email']
    return email
"#;

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn calc_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "sample_app/calculator.py", CALCULATOR_PY);
    dir
}

fn record(kind: ErrorKind, message: &str, file: Option<&str>, line: Option<u32>) -> ErrorRecord {
    ErrorRecord {
        kind,
        message: message.to_string(),
        raw_log_line: format!("{}: {}", kind, message),
        traceback: format!("{}: {}", kind, message),
        timestamp: chrono::Utc::now(),
        file_path: file.map(|f| f.to_string()),
        line_number: line,
    }
}

// ============================================
// Classification
// ============================================

#[test]
fn test_canonical_lines_classify_deterministically() {
    let cases = [
        ("ZeroDivisionError: division by zero", Some(ErrorKind::ZeroDivision)),
        ("KeyError: 'email'", Some(ErrorKind::KeyError)),
        ("IndexError: list index out of range", Some(ErrorKind::IndexError)),
        (
            "AttributeError: 'NoneType' object has no attribute 'name'",
            Some(ErrorKind::AttributeError),
        ),
        ("panic: runtime error: invalid memory address", None),
    ];

    for _ in 0..3 {
        for (line, expected) in &cases {
            assert_eq!(classify::classify(line), *expected, "line: {}", line);
        }
    }
}

// ============================================
// Locating
// ============================================

#[test]
fn test_locate_division_line_from_source() {
    let repo = calc_repo();
    let config = Config::default();
    let locator = locate::Locator::new(repo.path(), &config.scan);

    // Hint path but no hint line: the line must come from the source text
    let rec = record(
        ErrorKind::ZeroDivision,
        "division by zero",
        Some("sample_app/calculator.py"),
        None,
    );
    let location = locator.locate(&rec).expect("file should be located");

    assert!(location.file_path.ends_with("sample_app/calculator.py"));
    assert_eq!(location.line_number, 26);
    assert_eq!(location.enclosing_function.as_deref(), Some("divide"));
}

#[test]
fn test_locate_strips_container_prefix() {
    let repo = calc_repo();
    let config = Config::default();
    let locator = locate::Locator::new(repo.path(), &config.scan);

    let rec = record(
        ErrorKind::ZeroDivision,
        "division by zero",
        Some("/app/sample_app/calculator.py"),
        Some(26),
    );
    let location = locator.locate(&rec).expect("container path should resolve");
    assert_eq!(location.line_number, 26);
}

#[test]
fn test_locate_by_filename_when_path_is_wrong() {
    let repo = calc_repo();
    let config = Config::default();
    let locator = locate::Locator::new(repo.path(), &config.scan);

    let rec = record(
        ErrorKind::ZeroDivision,
        "division by zero",
        Some("some/other/tree/calculator.py"),
        None,
    );
    let location = locator.locate(&rec).expect("basename should be found");
    assert!(location.file_path.ends_with("calculator.py"));
    assert_eq!(location.line_number, 26);
}

#[test]
fn test_locate_by_content_without_any_hint() {
    let repo = TempDir::new().unwrap();
    write_file(repo.path(), "services/user_service.py", USER_SERVICE_PY);
    let config = Config::default();
    let locator = locate::Locator::new(repo.path(), &config.scan);

    let rec = record(ErrorKind::KeyError, "'email'", None, None);
    let location = locator.locate(&rec).expect("content scan should match");
    assert!(location.file_path.ends_with("user_service.py"));
    assert_eq!(location.line_number, 2);
}

#[test]
fn test_locate_miss_returns_none() {
    let repo = TempDir::new().unwrap();
    write_file(repo.path(), "readme.txt", "nothing to see");
    let config = Config::default();
    let locator = locate::Locator::new(repo.path(), &config.scan);

    let rec = record(ErrorKind::ZeroDivision, "division by zero", None, None);
    assert!(locator.locate(&rec).is_none());
}

#[test]
fn test_unreadable_file_does_not_abort_walk() {
    let repo = TempDir::new().unwrap();
    // Sorts before the real match and cannot be read as UTF-8
    fs::write(repo.path().join("aaa_binary.py"), [0xff, 0xfe, 0x2f, 0x00]).unwrap();
    write_file(repo.path(), "zzz_calc.py", "result = total / count\n");
    let config = Config::default();
    let locator = locate::Locator::new(repo.path(), &config.scan);

    let rec = record(ErrorKind::ZeroDivision, "division by zero", None, None);
    let location = locator.locate(&rec).expect("readable file should match");
    assert!(location.file_path.ends_with("zzz_calc.py"));
}

#[test]
fn test_locate_handles_glob_metacharacters_in_root() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("checkout [2024]");
    write_file(&root, "app/calc.py", "result = total / count\n");
    let config = Config::default();
    let locator = locate::Locator::new(&root, &config.scan);

    // Strategy 3: content scan must still walk the bracketed tree
    let rec = record(ErrorKind::ZeroDivision, "division by zero", None, None);
    let location = locator.locate(&rec).expect("content scan should match");
    assert!(location.file_path.ends_with("calc.py"));

    // Strategy 2: basename search must as well
    let rec = record(
        ErrorKind::ZeroDivision,
        "division by zero",
        Some("elsewhere/calc.py"),
        None,
    );
    let location = locator.locate(&rec).expect("basename should be found");
    assert!(location.file_path.ends_with("app/calc.py"));
}

#[test]
fn test_skip_dirs_are_excluded() {
    let repo = TempDir::new().unwrap();
    write_file(repo.path(), ".git/objects/fake.py", "result = a / b\n");
    let config = Config::default();
    let locator = locate::Locator::new(repo.path(), &config.scan);

    let rec = record(ErrorKind::ZeroDivision, "division by zero", None, None);
    assert!(locator.locate(&rec).is_none());
}

// ============================================
// Full pipeline
// ============================================

const TRACEBACK_LOG: &str = "2024-01-15 10:30:00 ERROR Unhandled exception in request\n\
Traceback (most recent call last):\n\
  File \"sample_app/calculator.py\", line 26, in divide\n\
2024-01-15 10:30:00 ZeroDivisionError: division by zero\n";

#[test]
fn test_pipeline_traceback_to_fix() {
    logmend_core::logging::init_test();
    let repo = calc_repo();
    let analyzer = Analyzer::default();

    let report = analyzer.analyze(TRACEBACK_LOG, repo.path()).unwrap();
    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.findings.len(), 1);

    let finding = &report.findings[0];
    assert_eq!(finding.record.kind, ErrorKind::ZeroDivision);
    assert_eq!(finding.record.file_path.as_deref(), Some("sample_app/calculator.py"));
    assert_eq!(finding.record.line_number, Some(26));
    assert_eq!(finding.record.message, "division by zero");

    let location = finding.location.as_ref().expect("source should be located");
    assert_eq!(location.line_number, 26);

    assert_eq!(finding.fix.original_code, "result = a / b");
    assert!(finding.fix.fixed_code.contains("if b != 0:"));
    assert!(finding.fix.confidence >= 0.85);
}

#[test]
fn test_pipeline_locator_miss_degrades_to_template() {
    let repo = TempDir::new().unwrap();
    write_file(repo.path(), "readme.txt", "docs only");
    let analyzer = Analyzer::default();

    let report = analyzer
        .analyze("2024-01-15 10:30:00 ZeroDivisionError: division by zero", repo.path())
        .unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    let finding = &report.findings[0];
    assert!(finding.location.is_none());
    assert!(finding.fix.original_code.contains("not found in repository"));
    assert!(finding.fix.confidence <= 0.6);
}

#[test]
fn test_pipeline_empty_log_completes() {
    let repo = calc_repo();
    let analyzer = Analyzer::default();

    let report = analyzer
        .analyze("all services healthy\nrequest served in 12ms\n", repo.path())
        .unwrap();
    assert_eq!(report.status, RunStatus::Completed);
    assert!(report.findings.is_empty());
}

#[test]
fn test_pipeline_missing_repo_is_error() {
    let analyzer = Analyzer::default();
    let result = analyzer.analyze(TRACEBACK_LOG, Path::new("/no/such/checkout"));
    assert!(result.is_err());
}

#[test]
fn test_pipeline_idempotent() {
    let repo = calc_repo();
    write_file(repo.path(), "services/user_service.py", USER_SERVICE_PY);
    let analyzer = Analyzer::default();

    // Timestamps come from the log lines, so repeated runs are byte-identical
    let log = "2024-01-15 10:30:00 ZeroDivisionError: division by zero\n\
2024-01-15 10:31:00 KeyError: 'email'\n";

    let first = analyzer.analyze(log, repo.path()).unwrap();
    let second = analyzer.analyze(log, repo.path()).unwrap();

    let a = serde_json::to_string(&first.findings).unwrap();
    let b = serde_json::to_string(&second.findings).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_pipeline_ordering_follows_discovery() {
    let repo = calc_repo();
    let analyzer = Analyzer::default();

    let log = "2024-01-15 10:30:00 KeyError: 'email'\n\
2024-01-15 10:31:00 ZeroDivisionError: division by zero\n";
    let report = analyzer.analyze(log, repo.path()).unwrap();

    assert_eq!(report.findings.len(), 2);
    assert_eq!(report.findings[0].record.kind, ErrorKind::KeyError);
    assert_eq!(report.findings[1].record.kind, ErrorKind::ZeroDivision);
}

// ============================================
// Run store integration
// ============================================

#[test]
fn test_run_store_tracks_progress_to_completion() {
    let repo = calc_repo();
    let analyzer = Analyzer::default();
    let store = RunStore::new();
    let run_id = store.create();

    let report = analyzer
        .analyze_run(&store, &run_id, TRACEBACK_LOG, repo.path())
        .unwrap();
    assert_eq!(report.run_id, run_id);

    let run = store.get(&run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.percent_complete, 100);
    assert_eq!(run.findings.len(), 1);
}

#[test]
fn test_run_store_records_fatal_error() {
    let analyzer = Analyzer::default();
    let store = RunStore::new();
    let run_id = store.create();

    let result = analyzer.analyze_run(&store, &run_id, TRACEBACK_LOG, Path::new("/no/such/repo"));
    assert!(result.is_err());

    let run = store.get(&run_id).unwrap();
    assert_eq!(run.status, RunStatus::Error);
    assert!(run.message.contains("repository root not found"));
}

#[test]
fn test_progress_is_monotone() {
    let repo = calc_repo();
    let analyzer = Analyzer::default();

    let mut history: Vec<u8> = Vec::new();
    analyzer
        .analyze_with_progress(TRACEBACK_LOG, repo.path(), |_, percent, _| {
            history.push(percent);
        })
        .unwrap();

    assert_eq!(*history.last().unwrap(), 100);
    assert!(history.windows(2).all(|w| w[0] <= w[1]));
}
