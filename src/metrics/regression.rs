// Regression and correlation metrics over real-valued targets
//
// Scores are computed in f32: R² through aprender's regression metrics,
// moments through trueno::Vector. Degenerate inputs (constant series,
// negative R² under a square root) are reported as MetricError::Undefined
// rather than NaN, so a bootstrap run that hits one aborts instead of
// silently counting a NaN comparison as "not greater".

use crate::error::MetricError;
use crate::metric::{check_lengths, Metric};
use aprender::metrics::r_squared;
use aprender::primitives::Vector as Series;
use trueno::Vector;

/// Coefficient of determination
///
/// `1 - SS_res / SS_tot`. A constant ground truth scores 1.0 when predicted
/// exactly and 0.0 otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct R2;

impl Metric<f64> for R2 {
    fn evaluate(&self, truth: &[f64], predictions: &[f64]) -> Result<f64, MetricError> {
        check_lengths(truth, predictions)?;
        r2(truth, predictions)
    }
}

/// Square root of [`R2`], the "R" reported next to R² in model evaluations
#[derive(Debug, Clone, Copy, Default)]
pub struct RootR2;

impl Metric<f64> for RootR2 {
    fn evaluate(&self, truth: &[f64], predictions: &[f64]) -> Result<f64, MetricError> {
        check_lengths(truth, predictions)?;
        let r2 = r2(truth, predictions)?;
        if r2 < 0.0 {
            return Err(MetricError::Undefined(format!(
                "R is undefined for negative R² ({:.6})",
                r2
            )));
        }
        Ok(r2.sqrt())
    }
}

/// Pearson product-moment correlation coefficient
#[derive(Debug, Clone, Copy, Default)]
pub struct Pearson;

impl Metric<f64> for Pearson {
    fn evaluate(&self, truth: &[f64], predictions: &[f64]) -> Result<f64, MetricError> {
        check_lengths(truth, predictions)?;
        pearson(&to_f32(truth), &to_f32(predictions))
    }
}

/// Spearman rank correlation: Pearson over average ranks
#[derive(Debug, Clone, Copy, Default)]
pub struct Spearman;

impl Metric<f64> for Spearman {
    fn evaluate(&self, truth: &[f64], predictions: &[f64]) -> Result<f64, MetricError> {
        check_lengths(truth, predictions)?;
        pearson(&average_ranks(truth), &average_ranks(predictions))
    }
}

fn to_f32(values: &[f64]) -> Vec<f32> {
    values.iter().map(|&v| v as f32).collect()
}

fn is_constant(values: &[f32]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn r2(truth: &[f64], predictions: &[f64]) -> Result<f64, MetricError> {
    let truth = to_f32(truth);
    let predictions = to_f32(predictions);

    if is_constant(&truth) {
        return Ok(if truth == predictions { 1.0 } else { 0.0 });
    }

    let score = r_squared(&Series::from_slice(&predictions), &Series::from_slice(&truth));
    finite(f64::from(score), "R²")
}

fn pearson(x: &[f32], y: &[f32]) -> Result<f64, MetricError> {
    if x.len() < 2 {
        return Err(MetricError::Undefined(
            "correlation needs at least 2 samples".to_string(),
        ));
    }
    if is_constant(x) || is_constant(y) {
        return Err(MetricError::Undefined(
            "correlation is undefined for a constant series".to_string(),
        ));
    }

    let x_vec = Vector::from_slice(x);
    let y_vec = Vector::from_slice(y);
    let mean_x = x_vec.mean().map_err(undefined)?;
    let mean_y = y_vec.mean().map_err(undefined)?;
    let var_x = x_vec.variance().map_err(undefined)?;
    let var_y = y_vec.variance().map_err(undefined)?;

    // Population covariance, matching trueno's population variance
    let products: Vec<f32> = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .collect();
    let cov = Vector::from_slice(&products).mean().map_err(undefined)?;

    if var_x <= 0.0 || var_y <= 0.0 {
        return Err(MetricError::Undefined(
            "correlation is undefined for a constant series".to_string(),
        ));
    }

    // Rounding can push |r| a hair past 1
    let r = f64::from(cov) / (f64::from(var_x).sqrt() * f64::from(var_y).sqrt());
    finite(r, "correlation").map(|r| r.clamp(-1.0, 1.0))
}

fn undefined(err: impl std::fmt::Display) -> MetricError {
    MetricError::Undefined(err.to_string())
}

fn finite(value: f64, what: &str) -> Result<f64, MetricError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MetricError::Undefined(format!("{} is not finite", what)))
    }
}

/// 1-based ranks; tied values share the mean of the ranks they span
fn average_ranks(values: &[f64]) -> Vec<f32> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f32 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}
