//! One-hot encoding for categorical features

use crate::error::{ChurnError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// One-hot encoder with a vocabulary frozen at fit time.
///
/// Each fitted column expands into one `{column}_{category}` indicator per
/// category, sorted so the layout is deterministic. Categories never seen
/// during fitting encode to all zeros rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    vocabularies: HashMap<String, Vec<String>>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sorted category vocabulary for each column.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        for col_name in columns {
            let ca = categorical_chunked(df, col_name)?;

            let categories: BTreeSet<String> = ca
                .into_iter()
                .flatten()
                .map(|s| s.to_string())
                .collect();

            self.vocabularies
                .insert(col_name.to_string(), categories.into_iter().collect());
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Expand every fitted column into its indicator columns, dropping the
    /// original.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }

        let mut result = df.clone();

        for (col_name, vocabulary) in &self.vocabularies {
            let ca = categorical_chunked(&result, col_name)?;

            for category in vocabulary {
                let values: Vec<i32> = ca
                    .into_iter()
                    .map(|v| if v == Some(category.as_str()) { 1 } else { 0 })
                    .collect();

                let indicator = Series::new(indicator_name(col_name, category).into(), values);
                result = result.with_column(indicator)?.clone();
            }

            result = result.drop(col_name)?;
        }

        Ok(result)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Encode one value for the fitted column. `None` (absent or null)
    /// behaves like an unseen category: all zeros.
    pub fn encode_value(&self, column: &str, value: Option<&str>) -> Result<Vec<f64>> {
        if !self.is_fitted {
            return Err(ChurnError::ModelNotFitted);
        }
        let vocabulary = self
            .vocabularies
            .get(column)
            .ok_or_else(|| ChurnError::FeatureNotFound(column.to_string()))?;

        Ok(vocabulary
            .iter()
            .map(|category| {
                if value == Some(category.as_str()) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect())
    }

    /// Indicator column names produced for the fitted column, in layout order.
    pub fn output_columns(&self, column: &str) -> Result<Vec<String>> {
        let vocabulary = self
            .vocabularies
            .get(column)
            .ok_or_else(|| ChurnError::FeatureNotFound(column.to_string()))?;

        Ok(vocabulary
            .iter()
            .map(|category| indicator_name(column, category))
            .collect())
    }
}

fn indicator_name(column: &str, category: &str) -> String {
    format!("{}_{}", column, category)
}

// Non-string categorical columns (0/1 service flags inferred as integers)
// are stringified so frame and record paths agree on the vocabulary.
fn categorical_chunked(df: &DataFrame, col_name: &str) -> Result<StringChunked> {
    let column = df
        .column(col_name)
        .map_err(|_| ChurnError::FeatureNotFound(col_name.to_string()))?;
    let casted = column
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| ChurnError::DataError(e.to_string()))?;
    Ok(casted
        .str()
        .map_err(|e| ChurnError::DataError(e.to_string()))?
        .clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onehot_expansion() {
        let df = df!("contract" => &["monthly", "yearly", "monthly", "two_year"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        let result = encoder.fit_transform(&df, &["contract"]).unwrap();

        assert!(result.column("contract").is_err());
        assert_eq!(result.width(), 3);
        assert!(result.column("contract_monthly").is_ok());
        assert!(result.column("contract_yearly").is_ok());
        assert!(result.column("contract_two_year").is_ok());
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let df = df!("c" => &["zebra", "apple", "mango"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["c"]).unwrap();

        let columns = encoder.output_columns("c").unwrap();
        assert_eq!(columns, vec!["c_apple", "c_mango", "c_zebra"]);
    }

    #[test]
    fn test_unknown_category_encodes_to_zeros() {
        let df = df!("c" => &["a", "b"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["c"]).unwrap();

        let unseen = df!("c" => &["never_seen"]).unwrap();
        let result = encoder.transform(&unseen).unwrap();

        for name in ["c_a", "c_b"] {
            let ca = result
                .column(name)
                .unwrap()
                .as_materialized_series()
                .i32()
                .unwrap()
                .clone();
            assert_eq!(ca.get(0), Some(0));
        }
    }

    #[test]
    fn test_encode_value() {
        let df = df!("c" => &["a", "b", "c"]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["c"]).unwrap();

        assert_eq!(encoder.encode_value("c", Some("b")).unwrap(), vec![0.0, 1.0, 0.0]);
        assert_eq!(encoder.encode_value("c", Some("zzz")).unwrap(), vec![0.0, 0.0, 0.0]);
        assert_eq!(encoder.encode_value("c", None).unwrap(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_integer_flag_column() {
        let df = df!("senior" => &[0i64, 1, 0]).unwrap();

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&df, &["senior"]).unwrap();

        let columns = encoder.output_columns("senior").unwrap();
        assert_eq!(columns, vec!["senior_0", "senior_1"]);
        assert_eq!(encoder.encode_value("senior", Some("1")).unwrap(), vec![0.0, 1.0]);
    }
}
