//! Storage backends for experiment runs

use super::tracker::Run;
use crate::error::{ChurnError, Result};
use std::path::PathBuf;

/// Persistence seam for experiment runs.
pub trait StorageBackend {
    /// Append a finished run to the experiment's record.
    fn append_run(&self, experiment: &str, run: &Run) -> Result<()>;

    /// Load every recorded run of an experiment (empty if none yet).
    fn load_runs(&self, experiment: &str) -> Result<Vec<Run>>;
}

/// Stores each experiment as one JSON file under a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn experiment_path(&self, experiment: &str) -> PathBuf {
        self.root.join(format!("{}.json", experiment))
    }
}

impl StorageBackend for LocalStorage {
    fn append_run(&self, experiment: &str, run: &Run) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;

        let mut runs = self.load_runs(experiment)?;
        runs.push(run.clone());

        let json = serde_json::to_string_pretty(&runs)?;
        std::fs::write(self.experiment_path(experiment), json)?;
        Ok(())
    }

    fn load_runs(&self, experiment: &str) -> Result<Vec<Run>> {
        let path = self.experiment_path(experiment);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&path)?;
        serde_json::from_str(&json)
            .map_err(|e| ChurnError::TrackingError(format!("{}: {}", path.display(), e)))
    }
}
