//! Feature specification

use serde::{Deserialize, Serialize};

/// Declares which columns of a customer frame need scaling versus encoding.
///
/// The numeric columns are named explicitly; every other non-label column is
/// treated as categorical. New columns therefore never silently reclassify
/// an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    /// Name of the binary churn label column
    pub label_column: String,

    /// Columns standardized at fit time; everything else is one-hot encoded
    pub numeric_columns: Vec<String>,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self {
            label_column: "Churn".to_string(),
            numeric_columns: vec![
                "tenure".to_string(),
                "MonthlyCharges".to_string(),
                "TotalCharges".to_string(),
            ],
        }
    }
}

impl FeatureSpec {
    /// Create a specification with the default column layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the label column
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label_column = label.into();
        self
    }

    /// Builder method to set the numeric columns
    pub fn with_numeric_columns(mut self, columns: Vec<String>) -> Self {
        self.numeric_columns = columns;
        self
    }
}
