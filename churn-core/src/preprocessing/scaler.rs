//! Standard scaling for numeric features

use super::numeric_chunked;
use crate::error::{ChurnError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for one fitted column: (x - mean) / std
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    mean: f64,
    std: f64,
}

/// Z-score scaler fitted on the training split only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit mean and standard deviation for each column.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| ChurnError::FeatureNotFound(col_name.to_string()))?;
            let ca = numeric_chunked(column.as_materialized_series())?;

            let mean = ca.mean().unwrap_or(0.0);
            let std = ca.std(1).unwrap_or(0.0);
            self.params.insert(
                col_name.to_string(),
                ScalerParams {
                    mean,
                    // Constant columns pass through unscaled.
                    std: if std == 0.0 { 1.0 } else { std },
                },
            );
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the fitted columns in place, leaving the rest untouched.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }

        let mut replacements = Vec::with_capacity(self.params.len());
        for (col_name, params) in &self.params {
            let column = df
                .column(col_name)
                .map_err(|_| ChurnError::FeatureNotFound(col_name.clone()))?;
            replacements.push(scale_series(column.as_materialized_series(), params)?);
        }

        let mut result = df.clone();
        for scaled in replacements {
            result = result.with_column(scaled)?.clone();
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Scale a single raw value for the fitted column.
    pub fn scale_value(&self, column: &str, value: f64) -> Result<f64> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }
        let params = self
            .params
            .get(column)
            .ok_or_else(|| ChurnError::FeatureNotFound(column.to_string()))?;
        Ok((value - params.mean) / params.std)
    }
}

fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
    let ca = numeric_chunked(series)?;

    let scaled: Float64Chunked = ca
        .into_iter()
        .map(|opt| opt.map(|v| (v - params.mean) / params.std))
        .collect();

    Ok(scaled.with_name(series.name().clone()).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardized_mean_and_std() {
        let df = df!("a" => &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let mut scaler = StandardScaler::new();
        let result = scaler.fit_transform(&df, &["a"]).unwrap();

        let ca = result
            .column("a")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .clone();
        assert!(ca.mean().unwrap().abs() < 1e-10);
        assert!((ca.std(1).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_passes_through() {
        let df = df!("a" => &[5.0, 5.0, 5.0]).unwrap();

        let mut scaler = StandardScaler::new();
        let result = scaler.fit_transform(&df, &["a"]).unwrap();

        let ca = result
            .column("a")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .clone();
        assert!(ca.into_iter().all(|v| v == Some(0.0)));
    }

    #[test]
    fn test_scale_value_matches_transform() {
        let df = df!("a" => &[10.0, 20.0, 30.0]).unwrap();

        let mut scaler = StandardScaler::new();
        scaler.fit(&df, &["a"]).unwrap();

        // (20 - 20) / 10 = 0
        assert!((scaler.scale_value("a", 20.0).unwrap()).abs() < 1e-10);
    }

    #[test]
    fn test_integer_column_is_coerced() {
        let df = df!("a" => &[1i64, 2, 3]).unwrap();

        let mut scaler = StandardScaler::new();
        let result = scaler.fit_transform(&df, &["a"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_not_fitted() {
        let df = df!("a" => &[1.0, 2.0]).unwrap();
        let scaler = StandardScaler::new();
        assert!(matches!(
            scaler.transform(&df),
            Err(ChurnError::ModelNotFitted)
        ));
    }
}
