//! Core domain types for logmend
//!
//! These types form the canonical data model shared by every stage of the
//! log-to-location-to-fix pipeline.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **ErrorKind** | A fixed exception category the classifier recognizes (ZeroDivisionError, KeyError, ...) |
//! | **ErrorRecord** | One classified error extracted from a log line plus its surrounding context |
//! | **CodeLocation** | A (file, line) pair in the target repository believed to correspond to an error |
//! | **FixSuggestion** | A hand-authored textual patch skeleton filled in from the located source line |
//! | **Finding** | One (record, location, fix) triple produced by the pipeline |
//! | **Run** | One end-to-end invocation over one block of log text against one repository snapshot |
//!
//! ## Data flow
//!
//! Raw log text → `Vec<ErrorRecord>` → per-record `Option<CodeLocation>` +
//! `FixSuggestion` → `AnalysisReport`. Strictly one-directional; no stage
//! mutates another stage's output after the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================
// Error kinds
// ============================================

/// The closed set of exception categories the classifier recognizes.
///
/// Declaration order matters: the classifier resolves overlapping matches
/// to whichever kind is declared first (see [`crate::classify`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ZeroDivision,
    KeyError,
    IndexError,
    ValueError,
    TypeError,
    AttributeError,
    JsonDecode,
    ImportError,
    NameError,
}

impl ErrorKind {
    /// All kinds, in classifier declaration order.
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::ZeroDivision,
        ErrorKind::KeyError,
        ErrorKind::IndexError,
        ErrorKind::ValueError,
        ErrorKind::TypeError,
        ErrorKind::AttributeError,
        ErrorKind::JsonDecode,
        ErrorKind::ImportError,
        ErrorKind::NameError,
    ];

    /// Canonical exception name as it appears in log text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ZeroDivision => "ZeroDivisionError",
            ErrorKind::KeyError => "KeyError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::ValueError => "ValueError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::AttributeError => "AttributeError",
            ErrorKind::JsonDecode => "JSONDecodeError",
            ErrorKind::ImportError => "ImportError",
            ErrorKind::NameError => "NameError",
        }
    }
}

impl std::str::FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown error kind: {}", s))
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Error records
// ============================================

/// One classified error extracted from log text.
///
/// Created by the classifier + extractor from a single matched line plus a
/// bounded window of surrounding lines (used only to recover traceback-style
/// file/line hints). Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Which exception category matched
    pub kind: ErrorKind,
    /// The message portion of the log line (text after the exception name)
    pub message: String,
    /// The raw log line that matched
    pub raw_log_line: String,
    /// Traceback-looking lines collected from the surrounding window
    pub traceback: String,
    /// Timestamp parsed from the matched line; process time when unparsable
    pub timestamp: DateTime<Utc>,
    /// File path hint recovered from traceback-style text, if any
    pub file_path: Option<String>,
    /// Line number hint recovered alongside the file path, if any
    pub line_number: Option<u32>,
}

// ============================================
// Code locations
// ============================================

/// A location in the target repository believed to correspond to an error.
///
/// Produced by the source locator; absence means the locator failed and
/// downstream synthesis falls back to the template-only branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeLocation {
    /// Path to the matched file (as found on disk)
    pub file_path: PathBuf,
    /// 1-indexed line number within the file
    pub line_number: u32,
    /// Name of the enclosing `def`, when one could be recovered
    pub enclosing_function: Option<String>,
}

// ============================================
// Fix suggestions
// ============================================

/// A templated fix for one [`ErrorRecord`].
///
/// `fixed_code` and `confidence` are a pure function of
/// (kind, optional original line); nothing external can alter that mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixSuggestion {
    /// Short human-readable description of the change
    pub description: String,
    /// The line believed faulty; placeholder text when not found
    pub original_code: String,
    /// Template-generated replacement
    pub fixed_code: String,
    /// Canned natural-language explanation
    pub explanation: String,
    /// Fixed constant per template branch, in [0, 1]; not a measurement
    pub confidence: f64,
}

// ============================================
// Runs
// ============================================

/// Lifecycle state of an analysis run.
///
/// Transitions are strictly forward; `Error` is reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Initializing,
    Parsing,
    Locating,
    Synthesizing,
    Completed,
    Error,
}

impl RunStatus {
    /// Ordinal used to enforce forward-only transitions.
    fn rank(&self) -> u8 {
        match self {
            RunStatus::Initializing => 0,
            RunStatus::Parsing => 1,
            RunStatus::Locating => 2,
            RunStatus::Synthesizing => 3,
            RunStatus::Completed => 4,
            RunStatus::Error => 5,
        }
    }

    /// Whether the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Error)
    }

    /// Whether moving to `next` is a legal forward transition.
    ///
    /// `Error` is always reachable from a non-terminal state; otherwise the
    /// ordinal must not decrease.
    pub fn can_advance_to(&self, next: RunStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if next == RunStatus::Error {
            return true;
        }
        next.rank() >= self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Initializing => "initializing",
            RunStatus::Parsing => "parsing",
            RunStatus::Locating => "locating",
            RunStatus::Synthesizing => "synthesizing",
            RunStatus::Completed => "completed",
            RunStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One (record, location, fix) triple produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub record: ErrorRecord,
    /// `None` when no file/line was found by any locator strategy
    pub location: Option<CodeLocation>,
    pub fix: FixSuggestion,
}

/// In-memory state of one analysis run.
///
/// Ephemeral: exists only for the run's duration inside a
/// [`RunStore`](crate::pipeline::RunStore). Progress is advertised
/// monotonically; see [`AnalysisRun::advance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    /// Unique run identifier
    pub id: String,
    /// Findings accumulated so far, in discovery order
    pub findings: Vec<Finding>,
    /// Current lifecycle state
    pub status: RunStatus,
    /// 0-100, monotone non-decreasing
    pub percent_complete: u8,
    /// Human-readable status message
    pub message: String,
    /// When the run was created
    pub started_at: DateTime<Utc>,
}

impl AnalysisRun {
    /// Create a fresh run in the `Initializing` state.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            findings: Vec::new(),
            status: RunStatus::Initializing,
            percent_complete: 0,
            message: "initializing".to_string(),
            started_at: Utc::now(),
        }
    }

    /// Advance status and progress, enforcing the forward-only contract.
    ///
    /// Illegal backward transitions are ignored; progress is clamped so the
    /// advertised percentage never decreases.
    pub fn advance(&mut self, status: RunStatus, percent: u8, message: impl Into<String>) {
        if !self.status.can_advance_to(status) {
            return;
        }
        self.status = status;
        self.percent_complete = self.percent_complete.max(percent.min(100));
        self.message = message.into();
    }
}

/// Final output of one run: ordered findings plus a terminal status tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Run identifier this report belongs to
    pub run_id: String,
    /// Findings in log discovery order
    pub findings: Vec<Finding>,
    /// Terminal status (`Completed` or `Error`)
    pub status: RunStatus,
    /// Human-readable outcome message
    pub message: String,
}
