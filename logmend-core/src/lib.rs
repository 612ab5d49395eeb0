//! # logmend-core
//!
//! Core library for logmend - a log-to-fix analysis pipeline.
//!
//! This library provides:
//! - Pattern-based classification of Python exception signatures in log text
//! - Extraction of timestamps, file/line hints, and traceback context
//! - Heuristic source location within a target repository
//! - Deterministic, template-driven fix synthesis
//! - Run orchestration with forward-only status and monotone progress
//!
//! ## Architecture
//!
//! Data flows strictly one-directional:
//! - **Classify:** log line → [`ErrorKind`]
//! - **Extract:** matched line + context window → [`ErrorRecord`]
//! - **Locate:** record + repository tree → optional [`CodeLocation`]
//! - **Synthesize:** kind + located line → [`FixSuggestion`]
//!
//! The locator reads the repository tree but never writes to it; applying a
//! fix is the responsibility of an external collaborator. None of the
//! heuristics prove anything about the code: the pipeline returns the first
//! plausible match, not the true faulting line.
//!
//! ## Example
//!
//! ```rust,no_run
//! use logmend_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::new(Config::default());
//! let report = analyzer
//!     .analyze("ZeroDivisionError: division by zero", std::path::Path::new("./repo"))
//!     .expect("analysis failed");
//! for finding in &report.findings {
//!     println!("{}: {}", finding.record.kind, finding.fix.description);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{Analyzer, RunStore};
pub use summary::{summarize, RunSummary};
pub use types::*;

// Public modules
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod fix;
pub mod locate;
pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod types;
