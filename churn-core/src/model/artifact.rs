//! Persisted model artifact

use crate::error::{ChurnError, Result};
use crate::model::LogisticRegression;
use crate::preprocessing::ChurnPreprocessor;
use ndarray::{Array1, Axis};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// The unit written by training and loaded by the prediction service:
/// fitted transformation plus fitted classifier, serialized as one JSON
/// document. Never mutated after creation; re-running training replaces it
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnModel {
    preprocessor: ChurnPreprocessor,
    classifier: LogisticRegression,
}

impl ChurnModel {
    pub fn new(preprocessor: ChurnPreprocessor, classifier: LogisticRegression) -> Self {
        Self {
            preprocessor,
            classifier,
        }
    }

    /// Churn probability for each row of a feature frame.
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = self.preprocessor.transform(df)?;
        self.classifier.predict_proba(&x)
    }

    /// Churn probability for a single prediction-time record.
    pub fn predict_record(&self, record: &serde_json::Map<String, Value>) -> Result<f64> {
        let x = self.preprocessor.transform_record(record)?;
        let x = x.insert_axis(Axis(0));
        let proba = self.classifier.predict_proba(&x)?;
        Ok(proba[0])
    }

    pub fn preprocessor(&self) -> &ChurnPreprocessor {
        &self.preprocessor
    }

    /// Serialize to a JSON artifact, creating the containing directory if
    /// absent.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load an artifact written by [`ChurnModel::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ChurnError::DataError(format!("model artifact {}: {}", path.display(), e))
        })?;
        let model: Self = serde_json::from_str(&json)?;
        Ok(model)
    }
}
