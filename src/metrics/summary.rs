// Per-model evaluation summaries
//
// All built-in scores of one model against the ground truth, the way model
// evaluations are usually reported next to a significance test. A score that
// is undefined for the data (R of a negative R², correlation of a constant
// series) is recorded as missing instead of failing the whole summary.

use super::classification::{Accuracy, ConfusionMatrix, F1Macro, F1Micro};
use super::regression::{Pearson, RootR2, Spearman, R2};
use crate::error::MetricError;
use crate::metric::{check_lengths, Metric};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Classification scores and confusion matrix of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSummary<T> {
    pub accuracy: f64,
    pub f1_micro: f64,
    pub f1_macro: f64,
    pub confusion_matrix: ConfusionMatrix<T>,
}

impl<T: Ord + Clone> ClassificationSummary<T> {
    pub fn evaluate(truth: &[T], predictions: &[T]) -> Result<Self, MetricError> {
        Ok(Self {
            accuracy: Accuracy.evaluate(truth, predictions)?,
            f1_micro: F1Micro.evaluate(truth, predictions)?,
            f1_macro: F1Macro.evaluate(truth, predictions)?,
            confusion_matrix: ConfusionMatrix::from_predictions(truth, predictions)?,
        })
    }
}

impl<T: std::fmt::Display> ClassificationSummary<T> {
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "  accuracy: {:.6}", self.accuracy);
        let _ = writeln!(report, "  F1 (micro): {:.6}", self.f1_micro);
        let _ = writeln!(report, "  F1 (macro): {:.6}", self.f1_macro);
        report.push_str("  confusion matrix:\n");
        for line in self.confusion_matrix.to_string().lines() {
            let _ = writeln!(report, "    {}", line);
        }
        report
    }
}

/// Regression and correlation scores of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub r2: f64,
    /// Missing when R² is negative
    pub r: Option<f64>,
    /// Missing when either series is constant
    pub pearson: Option<f64>,
    pub spearman: Option<f64>,
}

impl RegressionSummary {
    pub fn evaluate(truth: &[f64], predictions: &[f64]) -> Result<Self, MetricError> {
        check_lengths(truth, predictions)?;
        Ok(Self {
            r2: R2.evaluate(truth, predictions)?,
            r: defined(RootR2.evaluate(truth, predictions))?,
            pearson: defined(Pearson.evaluate(truth, predictions))?,
            spearman: defined(Spearman.evaluate(truth, predictions))?,
        })
    }

    pub fn to_report_string(&self) -> String {
        let show = |value: Option<f64>| match value {
            Some(v) => format!("{:.6}", v),
            None => "undefined".to_string(),
        };

        let mut report = String::new();
        let _ = writeln!(report, "  R²: {:.6}", self.r2);
        let _ = writeln!(report, "  R: {}", show(self.r));
        let _ = writeln!(report, "  Pearson: {}", show(self.pearson));
        let _ = writeln!(report, "  Spearman: {}", show(self.spearman));
        report
    }
}

/// `Undefined` becomes a missing score; any other failure propagates
fn defined(result: Result<f64, MetricError>) -> Result<Option<f64>, MetricError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MetricError::Undefined(_)) => Ok(None),
        Err(err) => Err(err),
    }
}
