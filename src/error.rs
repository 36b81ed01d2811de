//! Error types for bootstrap significance testing
//!
//! Every failure surfaces to the caller immediately. A metric that fails on a
//! single resample aborts the whole test; dropping that resample from the
//! denominator would bias the p-value.

use thiserror::Error;

/// Errors raised by a metric while scoring predictions against ground truth
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("length mismatch: {truth} ground-truth values vs {predictions} predictions")]
    LengthMismatch { truth: usize, predictions: usize },

    #[error("cannot score an empty sample")]
    Empty,

    #[error("metric undefined: {0}")]
    Undefined(String),

    #[error("{0}")]
    Custom(String),
}

/// Where a metric failure happened during a bootstrap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationStage {
    /// Scoring the unresampled data
    Observed,
    /// Scoring the resample with the given index
    Resample(usize),
}

impl std::fmt::Display for EvaluationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationStage::Observed => write!(f, "observed data"),
            EvaluationStage::Resample(i) => write!(f, "resample #{}", i),
        }
    }
}

/// Errors that can occur during a bootstrap significance test
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BootstrapError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("metric evaluation failed on {stage}: {source}")]
    MetricEvaluation {
        stage: EvaluationStage,
        #[source]
        source: MetricError,
    },

    #[error("bootstrap test cancelled after {completed} resamples")]
    Cancelled { completed: usize },

    #[error("worker thread panicked: {0}")]
    WorkerPanic(String),
}

/// Result type for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;
