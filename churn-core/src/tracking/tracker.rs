//! Experiment tracker

use super::storage::{LocalStorage, StorageBackend};
use crate::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Status of a recorded run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// One training run within an experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: String,
    pub run_name: String,
    pub start_time: u64,
    pub end_time: Option<u64>,
    pub params: BTreeMap<String, String>,
    pub metrics: BTreeMap<String, f64>,
    pub artifacts: Vec<String>,
    pub status: RunStatus,
}

impl Run {
    pub fn new(run_name: impl Into<String>) -> Self {
        let start_time = current_timestamp();
        Self {
            run_id: format!("run_{}", start_time),
            run_name: run_name.into(),
            start_time,
            end_time: None,
            params: BTreeMap::new(),
            metrics: BTreeMap::new(),
            artifacts: Vec::new(),
            status: RunStatus::Running,
        }
    }
}

/// Tracks one run at a time for a fixed experiment name.
pub struct ExperimentTracker {
    experiment: String,
    storage: Box<dyn StorageBackend + Send + Sync>,
    current: Option<Run>,
}

impl ExperimentTracker {
    /// Tracker backed by JSON files under `dir`.
    pub fn new(experiment: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self::with_storage(experiment, Box::new(LocalStorage::new(dir)))
    }

    pub fn with_storage(
        experiment: impl Into<String>,
        storage: Box<dyn StorageBackend + Send + Sync>,
    ) -> Self {
        Self {
            experiment: experiment.into(),
            storage,
            current: None,
        }
    }

    /// Start a new run, replacing any unfinished one.
    pub fn start_run(&mut self, run_name: impl Into<String>) -> String {
        let run = Run::new(run_name);
        let run_id = run.run_id.clone();
        self.current = Some(run);
        run_id
    }

    pub fn log_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        if let Some(ref mut run) = self.current {
            run.params.insert(key.into(), value.into());
        }
    }

    pub fn log_metric(&mut self, name: impl Into<String>, value: f64) {
        if let Some(ref mut run) = self.current {
            run.metrics.insert(name.into(), value);
        }
    }

    pub fn log_artifact(&mut self, path: impl Into<String>) {
        if let Some(ref mut run) = self.current {
            run.artifacts.push(path.into());
        }
    }

    /// Close the current run and persist it.
    pub fn end_run(&mut self, status: RunStatus) -> Result<()> {
        let mut run = self
            .current
            .take()
            .ok_or_else(|| ChurnError::TrackingError("no active run".to_string()))?;

        run.end_time = Some(current_timestamp());
        run.status = status;

        self.storage.append_run(&self.experiment, &run)
    }

    pub fn current_run(&self) -> Option<&Run> {
        self.current.as_ref()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tracker_records_run() {
        let dir = TempDir::new().unwrap();
        let mut tracker = ExperimentTracker::new("customer-churn", dir.path());

        let run_id = tracker.start_run("train");
        assert!(!run_id.is_empty());

        tracker.log_param("seed", "42");
        tracker.log_metric("auc", 0.91);
        tracker.log_metric("accuracy", 0.84);
        tracker.log_artifact("models/churn_model.json");
        tracker.end_run(RunStatus::Finished).unwrap();

        let runs = LocalStorage::new(dir.path()).load_runs("customer-churn").unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].params.get("seed"), Some(&"42".to_string()));
        assert_eq!(runs[0].metrics.get("auc"), Some(&0.91));
        assert_eq!(runs[0].artifacts, vec!["models/churn_model.json"]);
        assert_eq!(runs[0].status, RunStatus::Finished);
        assert!(runs[0].end_time.is_some());
    }

    #[test]
    fn test_end_without_run() {
        let dir = TempDir::new().unwrap();
        let mut tracker = ExperimentTracker::new("customer-churn", dir.path());
        assert!(tracker.end_run(RunStatus::Finished).is_err());
    }

    #[test]
    fn test_logging_without_run_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut tracker = ExperimentTracker::new("customer-churn", dir.path());
        tracker.log_metric("auc", 0.5);
        assert!(tracker.current_run().is_none());
    }
}
