//! Feature preprocessing
//!
//! Standard scaling for numeric columns and one-hot encoding for
//! categorical columns, combined by [`ChurnPreprocessor`] into the feature
//! matrix the classifier consumes.

mod config;
mod encoder;
mod pipeline;
mod scaler;

pub use config::FeatureSpec;
pub use encoder::OneHotEncoder;
pub use pipeline::ChurnPreprocessor;
pub use scaler::StandardScaler;

use crate::error::{ChurnError, Result};
use polars::prelude::*;

pub(crate) fn numeric_chunked(series: &Series) -> Result<Float64Chunked> {
    let casted = series
        .cast(&DataType::Float64)
        .map_err(|e| ChurnError::DataError(e.to_string()))?;
    Ok(casted
        .f64()
        .map_err(|e| ChurnError::DataError(e.to_string()))?
        .clone())
}
