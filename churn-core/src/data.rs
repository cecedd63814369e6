//! Data loading, cleaning, and splitting
//!
//! Reads the raw customer CSV, coerces the configured numeric columns,
//! drops incomplete rows, maps the churn label to 0/1, and produces the
//! seeded train/test partition.

use crate::error::{ChurnError, Result};
use crate::preprocessing::FeatureSpec;
use ndarray::Array1;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs::File;
use std::path::Path;

/// Load a CSV file of customer records.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ChurnError::DataError(format!("{}: {}", path.display(), e)))?;

    // Schema inference must see the whole file: numeric columns with sparse
    // blank values have to come back as strings for the clean step to
    // coerce, not fail the read.
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| ChurnError::DataError(e.to_string()))
}

/// Clean a raw frame for training.
///
/// Coerces every configured numeric column to `Float64` (unparseable or
/// empty values become null), drops every row with a null in any column,
/// and maps the label column to `1.0`/`0.0`. Rows are discarded, never
/// imputed. An empty result is an error, not a valid dataset.
pub fn clean(df: &DataFrame, features: &FeatureSpec) -> Result<DataFrame> {
    let mut result = df.clone();

    for col_name in &features.numeric_columns {
        let column = result
            .column(col_name)
            .map_err(|_| ChurnError::FeatureNotFound(col_name.clone()))?;
        let coerced = column
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| ChurnError::DataError(e.to_string()))?;
        result = result.with_column(coerced)?.clone();
    }

    // Row survives only if every column holds a value.
    let mut mask: Option<BooleanChunked> = None;
    for column in result.get_columns() {
        let valid = column.as_materialized_series().is_not_null();
        mask = Some(match mask {
            Some(m) => &m & &valid,
            None => valid,
        });
    }
    let mask = mask.ok_or_else(|| ChurnError::DataError("frame has no columns".to_string()))?;
    let result = result.filter(&mask)?;

    if result.height() == 0 {
        return Err(ChurnError::EmptyDataset);
    }

    encode_label(&result, &features.label_column)
}

/// Split cleaned rows into train and test frames with a seeded shuffle.
///
/// The partition is disjoint, its union is the input frame, and the test
/// side holds `test_fraction` of the rows (rounded). Not stratified.
pub fn split(df: &DataFrame, test_fraction: f64, seed: u64) -> Result<(DataFrame, DataFrame)> {
    let n = df.height();
    if n == 0 {
        return Err(ChurnError::EmptyDataset);
    }

    let n_test = (n as f64 * test_fraction).round() as usize;
    if n_test == 0 || n_test >= n {
        return Err(ChurnError::DataError(format!(
            "cannot hold out {} of {} rows for evaluation",
            n_test, n
        )));
    }

    let mut indices: Vec<u32> = (0..n as u32).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let train = df.take(&IdxCa::from_vec("idx".into(), train_idx.to_vec()))?;
    let test = df.take(&IdxCa::from_vec("idx".into(), test_idx.to_vec()))?;

    Ok((train, test))
}

/// Extract the label column of a cleaned frame as a 0/1 vector.
pub fn labels(df: &DataFrame, features: &FeatureSpec) -> Result<Array1<f64>> {
    let column = df
        .column(&features.label_column)
        .map_err(|_| ChurnError::FeatureNotFound(features.label_column.clone()))?;
    let ca = column
        .as_materialized_series()
        .f64()
        .map_err(|e| ChurnError::DataError(e.to_string()))?;

    Ok(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

fn encode_label(df: &DataFrame, label_column: &str) -> Result<DataFrame> {
    let column = df
        .column(label_column)
        .map_err(|_| ChurnError::FeatureNotFound(label_column.to_string()))?;
    let ca = column
        .as_materialized_series()
        .str()
        .map_err(|e| ChurnError::DataError(format!("label column `{}`: {}", label_column, e)))?;

    let encoded = ca
        .into_iter()
        .map(|v| match v {
            Some("Yes") => Ok(Some(1.0)),
            Some("No") => Ok(Some(0.0)),
            Some(other) => Err(ChurnError::DataError(format!(
                "unexpected label value `{}` in column `{}`",
                other, label_column
            ))),
            None => Ok(None),
        })
        .collect::<Result<Float64Chunked>>()?;

    let mut result = df.clone();
    result = result
        .with_column(encoded.with_name(label_column.into()).into_series())?
        .clone();

    Ok(result)
}
