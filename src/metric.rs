//! Metric capability used by the bootstrap tester
//!
//! A metric is anything that scores a slice of predictions against a slice of
//! ground truth. The tester never looks inside it: accuracy, F1, correlation
//! coefficients and custom scores all plug in through [`Metric`].
//!
//! Plain closures returning `f64` implement [`Metric`] directly. Closures that
//! can fail are wrapped in [`FallibleMetric`].

use crate::error::MetricError;

/// Scores predictions against ground truth
///
/// Implementations must be deterministic and must accept resampled input,
/// i.e. slices with duplicated rows, down to a single row repeated `L` times.
///
/// # Example
/// ```
/// use bootsig::metric::Metric;
///
/// let hits = |truth: &[u8], pred: &[u8]| {
///     truth.iter().zip(pred).filter(|(t, p)| t == p).count() as f64
/// };
/// assert_eq!(hits.evaluate(&[1, 0, 1], &[1, 1, 1]).unwrap(), 2.0);
/// ```
pub trait Metric<T, P = T> {
    /// Score `predictions` against `truth`; higher is better
    fn evaluate(&self, truth: &[T], predictions: &[P]) -> Result<f64, MetricError>;
}

impl<T, P, F> Metric<T, P> for F
where
    F: Fn(&[T], &[P]) -> f64,
{
    fn evaluate(&self, truth: &[T], predictions: &[P]) -> Result<f64, MetricError> {
        Ok(self(truth, predictions))
    }
}

/// Adapter for closures that report their own failures
///
/// # Example
/// ```
/// use bootsig::error::MetricError;
/// use bootsig::metric::{FallibleMetric, Metric};
///
/// let first = FallibleMetric(|truth: &[f64], pred: &[f64]| {
///     match (truth.first(), pred.first()) {
///         (Some(t), Some(p)) => Ok(-(t - p).abs()),
///         _ => Err(MetricError::Empty),
///     }
/// });
/// assert!(first.evaluate(&[], &[]).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FallibleMetric<F>(pub F);

impl<T, P, F> Metric<T, P> for FallibleMetric<F>
where
    F: Fn(&[T], &[P]) -> Result<f64, MetricError>,
{
    fn evaluate(&self, truth: &[T], predictions: &[P]) -> Result<f64, MetricError> {
        (self.0)(truth, predictions)
    }
}

/// Check the preconditions every built-in metric shares
pub(crate) fn check_lengths<T, P>(truth: &[T], predictions: &[P]) -> Result<(), MetricError> {
    if truth.len() != predictions.len() {
        return Err(MetricError::LengthMismatch {
            truth: truth.len(),
            predictions: predictions.len(),
        });
    }
    if truth.is_empty() {
        return Err(MetricError::Empty);
    }
    Ok(())
}
