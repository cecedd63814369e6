//! Training pipeline orchestrator
//!
//! One-shot batch job: load → clean → split → fit → evaluate → persist the
//! artifact → record the run. The artifact write happens first and never
//! depends on the tracker; a tracking failure downgrades to a warning.

use crate::data;
use crate::error::Result;
use crate::metrics::{accuracy, roc_auc, Evaluation};
use crate::model::{ChurnModel, LogisticRegression};
use crate::preprocessing::{ChurnPreprocessor, FeatureSpec};
use crate::tracking::{ExperimentTracker, RunStatus};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Configuration of one training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Raw customer CSV
    pub data_path: PathBuf,

    /// Where the fitted artifact is written
    pub model_path: PathBuf,

    /// Root directory of the local experiment store
    pub tracking_dir: PathBuf,

    /// Fixed experiment name runs are recorded under
    pub experiment_name: String,

    /// Column layout of the raw data
    pub features: FeatureSpec,

    /// Held-out fraction for evaluation
    pub test_fraction: f64,

    /// Seed for the reproducible split
    pub seed: u64,

    /// Classifier iteration cap
    pub max_iter: usize,

    /// Classifier step size
    pub learning_rate: f64,

    /// Classifier L2 penalty
    pub l2_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/raw/churn.csv"),
            model_path: PathBuf::from("models/churn_model.json"),
            tracking_dir: PathBuf::from("experiments"),
            experiment_name: "customer-churn".to_string(),
            features: FeatureSpec::default(),
            test_fraction: 0.2,
            seed: 42,
            max_iter: 500,
            learning_rate: 0.1,
            l2_penalty: 0.01,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the input CSV path
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Builder method to set the artifact path
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Builder method to set the experiment store directory
    pub fn with_tracking_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tracking_dir = dir.into();
        self
    }

    /// Builder method to set the feature layout
    pub fn with_features(mut self, features: FeatureSpec) -> Self {
        self.features = features;
        self
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    /// Builder method to set the split seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the iteration cap
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

/// Outcome of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub metrics: Evaluation,
    pub model_path: PathBuf,
    pub n_train: usize,
    pub n_test: usize,
    pub n_features: usize,
}

/// Run the full training pipeline.
pub fn train(config: &TrainingConfig) -> Result<TrainingReport> {
    let raw = data::load_csv(&config.data_path)?;
    info!(
        rows = raw.height(),
        columns = raw.width(),
        "loaded {}",
        config.data_path.display()
    );

    let cleaned = data::clean(&raw, &config.features)?;
    if cleaned.height() < raw.height() {
        info!(
            dropped = raw.height() - cleaned.height(),
            "dropped incomplete rows"
        );
    }

    let (train_df, test_df) = data::split(&cleaned, config.test_fraction, config.seed)?;
    let y_train = data::labels(&train_df, &config.features)?;
    let y_test = data::labels(&test_df, &config.features)?;
    let train_features = train_df.drop(&config.features.label_column)?;
    let test_features = test_df.drop(&config.features.label_column)?;

    let mut preprocessor = ChurnPreprocessor::new(config.features.clone());
    let x_train = preprocessor.fit_transform(&train_features)?;
    let x_test = preprocessor.transform(&test_features)?;

    let mut classifier = LogisticRegression::new()
        .with_max_iter(config.max_iter)
        .with_learning_rate(config.learning_rate)
        .with_l2_penalty(config.l2_penalty);
    classifier.fit(&x_train, &y_train)?;

    let probabilities = classifier.predict_proba(&x_test)?;
    let metrics = Evaluation {
        auc: roc_auc(&y_test, &probabilities)?,
        accuracy: accuracy(&y_test, &probabilities)?,
    };
    info!(auc = metrics.auc, accuracy = metrics.accuracy, "evaluation");

    let n_features = x_train.ncols();
    let report = TrainingReport {
        metrics,
        model_path: config.model_path.clone(),
        n_train: x_train.nrows(),
        n_test: x_test.nrows(),
        n_features,
    };

    let model = ChurnModel::new(preprocessor, classifier);
    model.save(&config.model_path)?;
    info!("model artifact written to {}", config.model_path.display());

    if let Err(e) = record_run(config, &metrics) {
        warn!("experiment tracking failed: {}", e);
    }

    Ok(report)
}

fn record_run(config: &TrainingConfig, metrics: &Evaluation) -> Result<()> {
    let mut tracker = ExperimentTracker::new(&config.experiment_name, &config.tracking_dir);
    tracker.start_run("train");

    tracker.log_param("seed", config.seed.to_string());
    tracker.log_param("test_fraction", config.test_fraction.to_string());
    tracker.log_param("max_iter", config.max_iter.to_string());
    tracker.log_param("learning_rate", config.learning_rate.to_string());
    tracker.log_param("l2_penalty", config.l2_penalty.to_string());

    tracker.log_metric("auc", metrics.auc);
    tracker.log_metric("accuracy", metrics.accuracy);
    tracker.log_artifact(config.model_path.display().to_string());

    tracker.end_run(RunStatus::Finished)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_paths() {
        let config = TrainingConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/raw/churn.csv"));
        assert_eq!(config.model_path, PathBuf::from("models/churn_model.json"));
        assert_eq!(config.seed, 42);
        assert_eq!(config.test_fraction, 0.2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::new()
            .with_data_path("other.csv")
            .with_seed(7)
            .with_max_iter(100);

        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_iter, 100);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let config = TrainingConfig::default().with_data_path("does/not/exist.csv");
        assert!(train(&config).is_err());
    }
}
