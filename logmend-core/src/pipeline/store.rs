//! In-memory run store
//!
//! An explicit store object for run state, passed by reference to whoever
//! needs to observe progress. Each run's state is private to its id, so
//! concurrent runs against the same repository checkout never interfere
//! and tests get isolation for free.

use crate::error::{Error, Result};
use crate::types::{AnalysisRun, Finding, RunStatus};
use std::collections::HashMap;
use std::sync::Mutex;

/// Thread-safe store of in-flight and finished runs.
#[derive(Debug, Default)]
pub struct RunStore {
    runs: Mutex<HashMap<String, AnalysisRun>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new run with a fresh id and return the id.
    pub fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let run = AnalysisRun::new(id.clone());
        self.runs
            .lock()
            .expect("run store lock poisoned")
            .insert(id.clone(), run);
        id
    }

    /// Snapshot of one run's current state.
    pub fn get(&self, id: &str) -> Option<AnalysisRun> {
        self.runs
            .lock()
            .expect("run store lock poisoned")
            .get(id)
            .cloned()
    }

    /// Advance a run's status and progress (forward-only, monotone).
    pub fn advance(
        &self,
        id: &str,
        status: RunStatus,
        percent: u8,
        message: impl Into<String>,
    ) -> Result<()> {
        let mut runs = self.runs.lock().expect("run store lock poisoned");
        let run = runs
            .get_mut(id)
            .ok_or_else(|| Error::RunNotFound(id.to_string()))?;
        run.advance(status, percent, message);
        Ok(())
    }

    /// Append one finding to a run, preserving discovery order.
    pub fn push_finding(&self, id: &str, finding: Finding) -> Result<()> {
        let mut runs = self.runs.lock().expect("run store lock poisoned");
        let run = runs
            .get_mut(id)
            .ok_or_else(|| Error::RunNotFound(id.to_string()))?;
        run.findings.push(finding);
        Ok(())
    }

    /// Remove a finished run, returning its final state.
    pub fn remove(&self, id: &str) -> Option<AnalysisRun> {
        self.runs
            .lock()
            .expect("run store lock poisoned")
            .remove(id)
    }

    /// Number of runs currently held.
    pub fn len(&self) -> usize {
        self.runs.lock().expect("run store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let store = RunStore::new();
        let id = store.create();

        let run = store.get(&id).unwrap();
        assert_eq!(run.status, RunStatus::Initializing);
        assert_eq!(run.percent_complete, 0);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_runs_are_isolated() {
        let store = RunStore::new();
        let a = store.create();
        let b = store.create();

        store.advance(&a, RunStatus::Locating, 40, "locating").unwrap();

        assert_eq!(store.get(&a).unwrap().status, RunStatus::Locating);
        assert_eq!(store.get(&b).unwrap().status, RunStatus::Initializing);
    }

    #[test]
    fn test_advance_missing_run() {
        let store = RunStore::new();
        let err = store
            .advance("nope", RunStatus::Parsing, 10, "parsing")
            .unwrap_err();
        assert!(matches!(err, Error::RunNotFound(_)));
    }

    #[test]
    fn test_remove() {
        let store = RunStore::new();
        let id = store.create();
        assert_eq!(store.len(), 1);

        let run = store.remove(&id).unwrap();
        assert_eq!(run.id, id);
        assert!(store.is_empty());
    }
}
