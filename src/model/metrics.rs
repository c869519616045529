//! Classification metrics for holdout evaluation

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Metrics for a binary classifier evaluated on a holdout split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Rank-based ROC-AUC; `None` when the holdout contains a single class
    pub auc_roc: Option<f64>,
    pub n_samples: usize,
}

impl ClassificationMetrics {
    /// Compute metrics from true labels, hard predictions, and probabilities
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>, y_prob: &Array1<f64>) -> Self {
        let n = y_true.len();

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| (*t - *p).abs() < 0.5)
            .count();
        let accuracy = if n > 0 { correct as f64 / n as f64 } else { 0.0 };

        let (tp, fp, fn_) = confusion_counts(y_true, y_pred);
        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            precision,
            recall,
            f1_score,
            auc_roc: roc_auc(y_true, y_prob),
            n_samples: n,
        }
    }
}

fn confusion_counts(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> (usize, usize, usize) {
    let mut tp = 0;
    let mut fp = 0;
    let mut fn_ = 0;
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        let truth = t >= 0.5;
        let pred = p >= 0.5;
        match (truth, pred) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }
    (tp, fp, fn_)
}

/// ROC-AUC via the Mann-Whitney rank statistic, with midrank handling for
/// tied probabilities. Returns `None` when only one class is present.
pub fn roc_auc(y_true: &Array1<f64>, y_prob: &Array1<f64>) -> Option<f64> {
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&t| t >= 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        y_prob[a]
            .partial_cmp(&y_prob[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Midranks over tied probability groups
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && y_prob[order[j + 1]] == y_prob[order[i]] {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = midrank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&t, _)| t >= 0.5)
        .map(|(_, &r)| r)
        .sum();

    let u = rank_sum_pos - (n_pos as f64 * (n_pos as f64 + 1.0)) / 2.0;
    Some(u / (n_pos as f64 * n_neg as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_classifier() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_pred = array![0.0, 0.0, 1.0, 1.0];
        let y_prob = array![0.1, 0.2, 0.8, 0.9];

        let metrics = ClassificationMetrics::compute(&y_true, &y_pred, &y_prob);
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
        assert_eq!(metrics.auc_roc, Some(1.0));
    }

    #[test]
    fn test_inverted_classifier_auc_zero() {
        let y_true = array![0.0, 0.0, 1.0, 1.0];
        let y_prob = array![0.9, 0.8, 0.2, 0.1];
        assert_eq!(roc_auc(&y_true, &y_prob), Some(0.0));
    }

    #[test]
    fn test_random_scores_auc_half() {
        // All probabilities tied: midranks give exactly 0.5
        let y_true = array![0.0, 1.0, 0.0, 1.0];
        let y_prob = array![0.5, 0.5, 0.5, 0.5];
        let auc = roc_auc(&y_true, &y_prob).unwrap();
        assert!((auc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_auc_none() {
        let y_true = array![1.0, 1.0, 1.0];
        let y_prob = array![0.2, 0.5, 0.9];
        assert_eq!(roc_auc(&y_true, &y_prob), None);
    }

    #[test]
    fn test_precision_recall_asymmetry() {
        // One false positive, one false negative
        let y_true = array![1.0, 1.0, 0.0, 0.0];
        let y_pred = array![1.0, 0.0, 1.0, 0.0];
        let y_prob = array![0.9, 0.4, 0.6, 0.1];

        let metrics = ClassificationMetrics::compute(&y_true, &y_pred, &y_prob);
        assert_eq!(metrics.accuracy, 0.5);
        assert_eq!(metrics.precision, 0.5);
        assert_eq!(metrics.recall, 0.5);
        assert_eq!(metrics.f1_score, 0.5);
    }

    #[test]
    fn test_no_positive_predictions() {
        let y_true = array![1.0, 0.0];
        let y_pred = array![0.0, 0.0];
        let y_prob = array![0.4, 0.3];
        let metrics = ClassificationMetrics::compute(&y_true, &y_pred, &y_prob);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1_score, 0.0);
    }
}
