//! Aggregate summaries over extracted error records

use crate::types::ErrorRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of one run's detected errors.
///
/// `by_kind` and `files_affected` use ordered collections so serialized
/// summaries are stable across runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Total number of records
    pub total: usize,
    /// Count per canonical kind name
    pub by_kind: BTreeMap<String, usize>,
    /// Distinct file path hints, sorted
    pub files_affected: Vec<String>,
    /// Most recent record timestamp
    pub most_recent: Option<DateTime<Utc>>,
    /// Oldest record timestamp
    pub oldest: Option<DateTime<Utc>>,
}

/// Summarize a slice of records.
pub fn summarize(records: &[ErrorRecord]) -> RunSummary {
    if records.is_empty() {
        return RunSummary::default();
    }

    let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
    let mut files: Vec<String> = Vec::new();

    for record in records {
        *by_kind.entry(record.kind.to_string()).or_insert(0) += 1;
        if let Some(path) = &record.file_path {
            if !files.contains(path) {
                files.push(path.clone());
            }
        }
    }
    files.sort();

    RunSummary {
        total: records.len(),
        by_kind,
        files_affected: files,
        most_recent: records.iter().map(|r| r.timestamp).max(),
        oldest: records.iter().map(|r| r.timestamp).min(),
    }
}
