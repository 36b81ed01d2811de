//! Built-in evaluation metrics
//!
//! The scores commonly reported when comparing classifiers and regressors on
//! a held-out set. Any of them can be handed to the bootstrap tester; so can
//! any custom [`Metric`](crate::metric::Metric).
//!
//! - Classification: [`Accuracy`], [`F1Micro`], [`F1Macro`]
//! - Regression/correlation: [`R2`], [`RootR2`], [`Pearson`], [`Spearman`]
//!
//! [`ClassificationSummary`] and [`RegressionSummary`] collect every score of
//! one model, plus a [`ConfusionMatrix`] for classifiers.

mod classification;
mod regression;
mod summary;

pub use classification::{Accuracy, ConfusionMatrix, F1Macro, F1Micro};
pub use regression::{Pearson, RootR2, Spearman, R2};
pub use summary::{ClassificationSummary, RegressionSummary};

use crate::metric::Metric;
use serde::{Deserialize, Serialize};

/// Boxed metric that can be shared across worker threads
pub type SharedMetric<T> = Box<dyn Metric<T> + Send + Sync>;

/// Metric selectable by name from the CLI or a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Fraction of exact label matches
    Accuracy,
    /// Micro-averaged F1
    #[value(name = "f1-micro")]
    F1Micro,
    /// Macro-averaged F1
    #[value(name = "f1-macro")]
    F1Macro,
    /// Coefficient of determination
    #[value(name = "r2")]
    R2,
    /// Square root of R²
    R,
    /// Pearson correlation coefficient
    Pearson,
    /// Spearman rank correlation
    Spearman,
}

impl MetricKind {
    /// Whether the metric compares discrete labels rather than numbers
    pub fn is_classification(self) -> bool {
        matches!(
            self,
            MetricKind::Accuracy | MetricKind::F1Micro | MetricKind::F1Macro
        )
    }

    /// Metric over string labels, for classification kinds
    pub fn label_metric(self) -> Option<SharedMetric<String>> {
        match self {
            MetricKind::Accuracy => Some(Box::new(Accuracy)),
            MetricKind::F1Micro => Some(Box::new(F1Micro)),
            MetricKind::F1Macro => Some(Box::new(F1Macro)),
            _ => None,
        }
    }

    /// Metric over real values, for regression kinds
    pub fn numeric_metric(self) -> Option<SharedMetric<f64>> {
        match self {
            MetricKind::R2 => Some(Box::new(R2)),
            MetricKind::R => Some(Box::new(RootR2)),
            MetricKind::Pearson => Some(Box::new(Pearson)),
            MetricKind::Spearman => Some(Box::new(Spearman)),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Accuracy => "accuracy",
            MetricKind::F1Micro => "f1-micro",
            MetricKind::F1Macro => "f1-macro",
            MetricKind::R2 => "r2",
            MetricKind::R => "r",
            MetricKind::Pearson => "pearson",
            MetricKind::Spearman => "spearman",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch_is_exclusive() {
        for kind in [
            MetricKind::Accuracy,
            MetricKind::F1Micro,
            MetricKind::F1Macro,
            MetricKind::R2,
            MetricKind::R,
            MetricKind::Pearson,
            MetricKind::Spearman,
        ] {
            assert_eq!(kind.label_metric().is_some(), kind.is_classification());
            assert_eq!(kind.numeric_metric().is_some(), !kind.is_classification());
        }
    }

    #[test]
    fn test_label_metric_scores_strings() {
        let metric = MetricKind::Accuracy.label_metric().unwrap();
        let truth = vec!["a".to_string(), "b".to_string()];
        let pred = vec!["a".to_string(), "a".to_string()];
        assert_eq!(metric.evaluate(&truth, &pred).unwrap(), 0.5);
    }

    #[test]
    fn test_kind_serde_names() {
        let kind: MetricKind = serde_json::from_str("\"f1-macro\"").unwrap();
        assert_eq!(kind, MetricKind::F1Macro);
        assert_eq!(serde_json::to_string(&MetricKind::R2).unwrap(), "\"r2\"");
        assert_eq!(MetricKind::Spearman.to_string(), "spearman");
    }
}
