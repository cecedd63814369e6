//! Combined preprocessing pipeline

use super::{numeric_chunked, FeatureSpec, OneHotEncoder, StandardScaler};
use crate::error::{ChurnError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fitted feature transformation: scaled numeric columns followed by the
/// one-hot expansion of every categorical column.
///
/// The feature layout is frozen at fit time and stored with the model, so a
/// record scored later is vectorized into exactly the columns the classifier
/// was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnPreprocessor {
    features: FeatureSpec,
    categorical_columns: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    feature_names: Vec<String>,
    is_fitted: bool,
}

impl ChurnPreprocessor {
    pub fn new(features: FeatureSpec) -> Self {
        Self {
            features,
            categorical_columns: Vec::new(),
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(),
            feature_names: Vec::new(),
            is_fitted: false,
        }
    }

    /// Fit the transformation on the training split.
    ///
    /// Every configured numeric column must be present; the remaining
    /// non-label columns become the categorical set, in frame order.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        for col_name in &self.features.numeric_columns {
            df.column(col_name)
                .map_err(|_| ChurnError::FeatureNotFound(col_name.clone()))?;
        }

        self.categorical_columns = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| {
                *name != self.features.label_column
                    && !self.features.numeric_columns.contains(name)
            })
            .collect();

        let numeric: Vec<&str> = self
            .features
            .numeric_columns
            .iter()
            .map(|s| s.as_str())
            .collect();
        self.scaler.fit(df, &numeric)?;

        let categorical: Vec<&str> = self
            .categorical_columns
            .iter()
            .map(|s| s.as_str())
            .collect();
        self.encoder.fit(df, &categorical)?;

        self.feature_names = self.features.numeric_columns.clone();
        for col_name in &self.categorical_columns {
            self.feature_names
                .extend(self.encoder.output_columns(col_name)?);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform a frame into the feature matrix, rows in frame order.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }

        let scaled = self.scaler.transform(df)?;
        let encoded = self.encoder.transform(&scaled)?;
        self.extract_matrix(&encoded)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Vectorize a single prediction-time record.
    ///
    /// Numeric features must be present as JSON numbers; a missing or
    /// wrong-typed numeric value is an input error. Categorical features
    /// are stringified; missing or unknown values encode to all zeros.
    pub fn transform_record(&self, record: &serde_json::Map<String, Value>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }

        let mut values = Vec::with_capacity(self.feature_names.len());

        for col_name in &self.features.numeric_columns {
            let raw = match record.get(col_name) {
                Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                    ChurnError::InvalidInput(format!("`{}` is not representable as a float", col_name))
                })?,
                Some(Value::Null) | None => {
                    return Err(ChurnError::FeatureNotFound(col_name.clone()))
                }
                Some(other) => {
                    return Err(ChurnError::InvalidInput(format!(
                        "`{}` expects a number, got {}",
                        col_name, other
                    )))
                }
            };
            values.push(self.scaler.scale_value(col_name, raw)?);
        }

        for col_name in &self.categorical_columns {
            let category = match record.get(col_name) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                Some(Value::Null) | None => None,
                Some(other) => {
                    return Err(ChurnError::InvalidInput(format!(
                        "`{}` expects a scalar, got {}",
                        col_name, other
                    )))
                }
            };
            values.extend(self.encoder.encode_value(col_name, category.as_deref())?);
        }

        Ok(Array1::from_vec(values))
    }

    /// Feature layout in matrix column order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Categorical column names derived at fit time
    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn features(&self) -> &FeatureSpec {
        &self.features
    }

    fn extract_matrix(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let n_rows = df.height();
        let n_cols = self.feature_names.len();
        let mut data = Vec::with_capacity(n_rows * n_cols);

        for name in &self.feature_names {
            let column = df
                .column(name)
                .map_err(|_| ChurnError::FeatureNotFound(name.clone()))?;
            let ca = numeric_chunked(column.as_materialized_series())?;
            data.extend(ca.into_iter().map(|v| v.unwrap_or(0.0)));
        }

        let x = Array2::from_shape_vec((n_cols, n_rows), data)
            .map_err(|e| ChurnError::ShapeError {
                expected: format!("({}, {})", n_cols, n_rows),
                actual: e.to_string(),
            })?
            .t()
            .to_owned();

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn training_frame() -> DataFrame {
        df!(
            "tenure" => &[1.0, 24.0, 60.0, 12.0],
            "MonthlyCharges" => &[29.85, 56.95, 104.80, 42.30],
            "TotalCharges" => &[29.85, 1366.80, 6288.0, 507.60],
            "Contract" => &["monthly", "yearly", "two_year", "monthly"]
        )
        .unwrap()
    }

    fn fitted() -> ChurnPreprocessor {
        let mut preprocessor = ChurnPreprocessor::new(FeatureSpec::default());
        preprocessor.fit(&training_frame()).unwrap();
        preprocessor
    }

    fn record(tenure: f64, contract: &str) -> serde_json::Map<String, Value> {
        json!({
            "tenure": tenure,
            "MonthlyCharges": 50.0,
            "TotalCharges": 600.0,
            "Contract": contract
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_feature_layout() {
        let preprocessor = fitted();

        assert_eq!(
            preprocessor.feature_names(),
            &[
                "tenure",
                "MonthlyCharges",
                "TotalCharges",
                "Contract_monthly",
                "Contract_two_year",
                "Contract_yearly",
            ]
        );
    }

    #[test]
    fn test_transform_shape() {
        let preprocessor = fitted();
        let x = preprocessor.transform(&training_frame()).unwrap();

        assert_eq!(x.nrows(), 4);
        assert_eq!(x.ncols(), 6);
    }

    #[test]
    fn test_record_matches_layout() {
        let preprocessor = fitted();
        let x = preprocessor.transform_record(&record(24.0, "yearly")).unwrap();

        assert_eq!(x.len(), 6);
        // Indicator block: monthly, two_year, yearly
        assert_eq!(x[3], 0.0);
        assert_eq!(x[4], 0.0);
        assert_eq!(x[5], 1.0);
    }

    #[test]
    fn test_record_unknown_category_is_absorbed() {
        let preprocessor = fitted();
        let x = preprocessor
            .transform_record(&record(24.0, "never_seen"))
            .unwrap();

        assert_eq!(&x.to_vec()[3..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_record_missing_numeric_is_rejected() {
        let preprocessor = fitted();
        let mut rec = record(24.0, "monthly");
        rec.remove("tenure");

        let result = preprocessor.transform_record(&rec);
        assert!(matches!(result, Err(ChurnError::FeatureNotFound(_))));
    }

    #[test]
    fn test_record_wrong_typed_numeric_is_rejected() {
        let preprocessor = fitted();
        let mut rec = record(24.0, "monthly");
        rec.insert("tenure".to_string(), json!("twelve"));

        let result = preprocessor.transform_record(&rec);
        assert!(matches!(result, Err(ChurnError::InvalidInput(_))));
    }

    #[test]
    fn test_record_missing_categorical_is_absorbed() {
        let preprocessor = fitted();
        let mut rec = record(24.0, "monthly");
        rec.remove("Contract");

        let x = preprocessor.transform_record(&rec).unwrap();
        assert_eq!(&x.to_vec()[3..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_fit_requires_numeric_columns() {
        let df = df!("Contract" => &["monthly", "yearly"]).unwrap();
        let mut preprocessor = ChurnPreprocessor::new(FeatureSpec::default());

        let result = preprocessor.fit(&df);
        assert!(matches!(result, Err(ChurnError::FeatureNotFound(_))));
    }
}
