// Classification metrics over discrete labels
//
// Labels are encoded as dense class indices over the sorted union of truth
// and predictions, then scored with aprender's classification metrics. The
// sorted encoding keeps class order stable, so seeded bootstrap runs stay
// bit-identical.

use crate::error::MetricError;
use crate::metric::{check_lengths, Metric};
use aprender::metrics::classification::{accuracy, f1_score, Average};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fraction of positions where the prediction equals the ground truth
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl<T: Ord> Metric<T> for Accuracy {
    fn evaluate(&self, truth: &[T], predictions: &[T]) -> Result<f64, MetricError> {
        check_lengths(truth, predictions)?;
        let encoded = LabelEncoding::new(truth, predictions);
        Ok(f64::from(accuracy(&encoded.predictions, &encoded.truth)))
    }
}

/// Micro-averaged F1: pooled TP/FP/FN over all classes
///
/// For single-label multiclass data every miss is one FP and one FN, so this
/// equals [`Accuracy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct F1Micro;

impl<T: Ord> Metric<T> for F1Micro {
    fn evaluate(&self, truth: &[T], predictions: &[T]) -> Result<f64, MetricError> {
        check_lengths(truth, predictions)?;
        let encoded = LabelEncoding::new(truth, predictions);
        Ok(f64::from(f1_score(
            &encoded.predictions,
            &encoded.truth,
            Average::Micro,
        )))
    }
}

/// Macro-averaged F1: unweighted mean of per-class F1
#[derive(Debug, Clone, Copy, Default)]
pub struct F1Macro;

impl<T: Ord> Metric<T> for F1Macro {
    fn evaluate(&self, truth: &[T], predictions: &[T]) -> Result<f64, MetricError> {
        check_lengths(truth, predictions)?;
        let encoded = LabelEncoding::new(truth, predictions);
        Ok(f64::from(f1_score(
            &encoded.predictions,
            &encoded.truth,
            Average::Macro,
        )))
    }
}

/// Labels mapped to class indices `0..classes.len()` in sorted label order
struct LabelEncoding<'a, T> {
    classes: Vec<&'a T>,
    truth: Vec<usize>,
    predictions: Vec<usize>,
}

impl<'a, T: Ord> LabelEncoding<'a, T> {
    fn new(truth: &'a [T], predictions: &'a [T]) -> Self {
        let mut index: BTreeMap<&T, usize> =
            truth.iter().chain(predictions).map(|l| (l, 0)).collect();
        for (i, slot) in index.values_mut().enumerate() {
            *slot = i;
        }

        let encode = |labels: &'a [T]| labels.iter().map(|l| index[l]).collect::<Vec<usize>>();
        let truth_idx = encode(truth);
        let pred_idx = encode(predictions);

        Self {
            classes: index.into_keys().collect(),
            truth: truth_idx,
            predictions: pred_idx,
        }
    }
}

/// Counts of (actual, predicted) label pairs
///
/// Rows are ground-truth labels, columns are predicted labels, both in sorted
/// order over the union of labels seen on either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix<T> {
    labels: Vec<T>,
    counts: Vec<Vec<usize>>,
}

impl<T: Ord + Clone> ConfusionMatrix<T> {
    pub fn from_predictions(truth: &[T], predictions: &[T]) -> Result<Self, MetricError> {
        check_lengths(truth, predictions)?;
        let encoded = LabelEncoding::new(truth, predictions);

        let size = encoded.classes.len();
        let mut counts = vec![vec![0; size]; size];
        for (&t, &p) in encoded.truth.iter().zip(&encoded.predictions) {
            counts[t][p] += 1;
        }

        Ok(Self {
            labels: encoded.classes.into_iter().cloned().collect(),
            counts,
        })
    }
}

impl<T: Ord> ConfusionMatrix<T> {
    pub fn labels(&self) -> &[T] {
        &self.labels
    }

    /// Row-major counts, `counts()[actual][predicted]`
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Number of instances with ground truth `actual` predicted as `predicted`
    pub fn count(&self, actual: &T, predicted: &T) -> usize {
        match (
            self.labels.binary_search(actual),
            self.labels.binary_search(predicted),
        ) {
            (Ok(row), Ok(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal
    pub fn correct(&self) -> usize {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }
}

impl<T: std::fmt::Display> std::fmt::Display for ConfusionMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.labels.iter().map(ToString::to_string).collect();
        let width = names
            .iter()
            .map(String::len)
            .chain(self.counts.iter().flatten().map(|c| c.to_string().len()))
            .chain(std::iter::once("actual\\pred".len()))
            .max()
            .unwrap_or(0);

        write!(f, "{:>width$}", "actual\\pred", width = width)?;
        for name in &names {
            write!(f, " {:>width$}", name, width = width)?;
        }
        writeln!(f)?;

        for (name, row) in names.iter().zip(&self.counts) {
            write!(f, "{:>width$}", name, width = width)?;
            for count in row {
                write!(f, " {:>width$}", count, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
