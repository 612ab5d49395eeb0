//! Analysis orchestration
//!
//! Sequences the pipeline stages over one block of log text against one
//! repository snapshot:
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌─────────┐    ┌────────────┐
//! │ classify │ ─► │  extract  │ ─► │ locate  │ ─► │ synthesize │
//! └──────────┘    └───────────┘    └─────────┘    └────────────┘
//!      per line        per match       per record      per record
//! ```
//!
//! A run is sequential and its result list follows log discovery order.
//! Per-record failures (locator miss, unreadable source line) degrade that
//! single record to the template branch and continue; only a missing
//! repository root or unreadable log text is fatal and transitions the run
//! to `Error`. A log with zero matching lines completes normally with an
//! empty result list.
//!
//! Progress is advertised through a callback (or a [`RunStore`]) in
//! monotone bands: 0-20 parsing, 20-60 locating, 60-90 synthesizing,
//! 100 completed.

mod store;

pub use store::RunStore;

use crate::classify::classify;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::extract;
use crate::fix::synthesize;
use crate::locate::Locator;
use crate::types::{AnalysisReport, CodeLocation, ErrorRecord, Finding, RunStatus};
use std::path::Path;

/// Progress bands per stage, upper bounds.
const PARSING_CEILING: u8 = 20;
const LOCATING_CEILING: u8 = 60;
const SYNTHESIZING_CEILING: u8 = 90;

/// Orchestrates one or more analysis runs.
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one analysis, discarding progress updates.
    pub fn analyze(&self, log_text: &str, repo_root: &Path) -> Result<AnalysisReport> {
        self.analyze_with_progress(log_text, repo_root, |_, _, _| {})
    }

    /// Run one analysis, reading the log text from a file first.
    ///
    /// An unreadable log file is the one input failure surfaced as a hard
    /// error rather than a degraded record.
    pub fn analyze_file(&self, log_path: &Path, repo_root: &Path) -> Result<AnalysisReport> {
        let log_text = std::fs::read_to_string(log_path)
            .map_err(|e| Error::LogUnreadable(format!("{}: {}", log_path.display(), e)))?;
        self.analyze(&log_text, repo_root)
    }

    /// Run one analysis tracked in a [`RunStore`] under `run_id`.
    ///
    /// The store is updated as stages progress; on fatal failure the run is
    /// moved to `Error` with the failure message before the error returns.
    pub fn analyze_run(
        &self,
        store: &RunStore,
        run_id: &str,
        log_text: &str,
        repo_root: &Path,
    ) -> Result<AnalysisReport> {
        let result = self.analyze_with_progress(log_text, repo_root, |status, percent, msg| {
            let _ = store.advance(run_id, status, percent, msg);
        });

        match &result {
            Ok(report) => {
                for finding in &report.findings {
                    store.push_finding(run_id, finding.clone())?;
                }
            }
            Err(e) => {
                let _ = store.advance(run_id, RunStatus::Error, 0, e.to_string());
            }
        }

        result.map(|mut report| {
            report.run_id = run_id.to_string();
            report
        })
    }

    /// Core pipeline with a progress callback.
    ///
    /// The callback receives `(status, percent, message)` at each stage
    /// boundary and once per record during the fan-out stages.
    pub fn analyze_with_progress<F>(
        &self,
        log_text: &str,
        repo_root: &Path,
        mut on_progress: F,
    ) -> Result<AnalysisReport>
    where
        F: FnMut(RunStatus, u8, &str),
    {
        on_progress(RunStatus::Initializing, 0, "initializing");

        if !repo_root.is_dir() {
            return Err(Error::RepoNotFound(repo_root.to_path_buf()));
        }

        // Stage 1: classify + extract
        on_progress(RunStatus::Parsing, 5, "parsing log text");
        let records = parse_records(log_text);
        tracing::info!(count = records.len(), "classified error records");
        on_progress(
            RunStatus::Parsing,
            PARSING_CEILING,
            &format!("found {} errors", records.len()),
        );

        // Stage 2: per-record locate
        let locator = Locator::new(repo_root, &self.config.scan);
        let total = records.len().max(1);
        let mut locations: Vec<Option<CodeLocation>> = Vec::with_capacity(records.len());

        on_progress(RunStatus::Locating, PARSING_CEILING, "locating source code");
        for (i, record) in records.iter().enumerate() {
            let location = locator.locate(record);
            if location.is_none() {
                tracing::debug!(kind = %record.kind, "no source location found");
            }
            locations.push(location);

            let percent = PARSING_CEILING
                + (((i + 1) * (LOCATING_CEILING - PARSING_CEILING) as usize) / total) as u8;
            on_progress(
                RunStatus::Locating,
                percent,
                &format!("located {}/{}", i + 1, records.len()),
            );
        }

        // Stage 3: per-record synthesize
        on_progress(RunStatus::Synthesizing, LOCATING_CEILING, "synthesizing fixes");
        let mut findings = Vec::with_capacity(records.len());
        for (i, (record, location)) in records.into_iter().zip(locations).enumerate() {
            let original_line = location.as_ref().and_then(read_located_line);
            let fix = synthesize(
                record.kind,
                location.as_ref(),
                original_line.as_deref(),
                &record.message,
            );
            findings.push(Finding {
                record,
                location,
                fix,
            });

            let percent = LOCATING_CEILING
                + (((i + 1) * (SYNTHESIZING_CEILING - LOCATING_CEILING) as usize) / total) as u8;
            on_progress(
                RunStatus::Synthesizing,
                percent,
                &format!("synthesized {}/{}", i + 1, total),
            );
        }

        let located = findings.iter().filter(|f| f.location.is_some()).count();
        let message = format!(
            "analysis complete: {} errors, {} located in source",
            findings.len(),
            located
        );
        on_progress(RunStatus::Completed, 100, &message);

        Ok(AnalysisReport {
            run_id: String::new(),
            findings,
            status: RunStatus::Completed,
            message,
        })
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Classify every log line and extract a record per match, in file order.
fn parse_records(log_text: &str) -> Vec<ErrorRecord> {
    let lines: Vec<String> = log_text.lines().map(|l| l.to_string()).collect();

    let mut records = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(kind) = classify(trimmed) {
            records.push(extract(&lines, i, kind));
        }
    }
    records
}

/// Read the located line's text; any failure degrades to `None` and the
/// synthesizer's template branch.
fn read_located_line(location: &CodeLocation) -> Option<String> {
    let content = std::fs::read_to_string(&location.file_path).ok()?;
    let text = content
        .lines()
        .nth(location.line_number.saturating_sub(1) as usize)?
        .trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
