//! Evaluation metrics for the held-out split

use crate::error::{ChurnError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics of one training run; logged, never persisted with the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Area under the ROC curve
    pub auc: f64,
    /// Fraction correct at the 0.5 probability threshold
    pub accuracy: f64,
}

/// Accuracy of thresholding probabilities at 0.5 against 0/1 labels.
pub fn accuracy(y_true: &Array1<f64>, probabilities: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, probabilities)?;
    if y_true.is_empty() {
        return Err(ChurnError::EvaluationError(
            "accuracy of an empty evaluation set is undefined".to_string(),
        ));
    }

    let correct = y_true
        .iter()
        .zip(probabilities.iter())
        .filter(|(label, p)| (**p >= 0.5) == (**label == 1.0))
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Area under the ROC curve from class-1 probabilities.
///
/// Computed as the rank statistic with tied scores assigned their average
/// rank. Requires both classes in the evaluation set.
pub fn roc_auc(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, scores)?;

    let n = y_true.len();
    let n_pos = y_true.iter().filter(|v| **v == 1.0).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ChurnError::EvaluationError(
            "ROC AUC requires both classes in the evaluation set".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Average ranks across runs of tied scores (1-based).
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = avg_rank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(label, _)| **label == 1.0)
        .map(|(_, rank)| *rank)
        .sum();

    let auc = (positive_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0)
        / (n_pos as f64 * n_neg as f64);

    Ok(auc)
}

fn check_lengths(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<()> {
    if y_true.len() != scores.len() {
        return Err(ChurnError::ShapeError {
            expected: format!("{} scores", y_true.len()),
            actual: format!("{} scores", scores.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_ranking() {
        let y = array![0.0, 0.0, 1.0, 1.0];
        let scores = array![0.1, 0.2, 0.8, 0.9];
        assert!((roc_auc(&y, &scores).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_ranking() {
        let y = array![1.0, 1.0, 0.0, 0.0];
        let scores = array![0.1, 0.2, 0.8, 0.9];
        assert!(roc_auc(&y, &scores).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_tied_scores() {
        let y = array![0.0, 1.0, 0.0, 1.0];
        let scores = array![0.5, 0.5, 0.5, 0.5];
        assert!((roc_auc(&y, &scores).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_partial_ranking() {
        // One of four positive/negative pairs is ranked wrongly: AUC 0.75.
        let y = array![0.0, 1.0, 0.0, 1.0];
        let scores = array![0.4, 0.3, 0.2, 0.8];
        assert!((roc_auc(&y, &scores).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_is_an_error() {
        let y = array![1.0, 1.0];
        let scores = array![0.4, 0.6];
        assert!(matches!(
            roc_auc(&y, &scores),
            Err(ChurnError::EvaluationError(_))
        ));
    }

    #[test]
    fn test_accuracy_threshold() {
        let y = array![0.0, 0.0, 1.0, 1.0];
        let probabilities = array![0.2, 0.7, 0.9, 0.4];
        assert!((accuracy(&y, &probabilities).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_boundary_half_counts_positive() {
        let y = array![1.0];
        let probabilities = array![0.5];
        assert_eq!(accuracy(&y, &probabilities).unwrap(), 1.0);
    }

    #[test]
    fn test_length_mismatch() {
        let y = array![0.0, 1.0];
        let scores = array![0.5];
        assert!(matches!(
            roc_auc(&y, &scores),
            Err(ChurnError::ShapeError { .. })
        ));
    }
}
