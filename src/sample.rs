//! Aligned evaluation samples and bootstrap resamples
//!
//! A [`SampleSet`] holds ground truth plus the predictions of two models, all
//! index-aligned. A resample draws `L` row indices with replacement and
//! gathers the same rows from all three columns, so each truth value stays
//! paired with the two predictions made for it.

use crate::error::{BootstrapError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ground truth and two models' predictions over the same `L` instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSampleSet<T, P>", bound(deserialize = "T: Deserialize<'de>, P: Deserialize<'de>"))]
pub struct SampleSet<T, P = T> {
    y_true: Vec<T>,
    pred_a: Vec<P>,
    pred_b: Vec<P>,
}

#[derive(Deserialize)]
struct RawSampleSet<T, P> {
    y_true: Vec<T>,
    pred_a: Vec<P>,
    pred_b: Vec<P>,
}

impl<T, P> TryFrom<RawSampleSet<T, P>> for SampleSet<T, P> {
    type Error = BootstrapError;

    fn try_from(raw: RawSampleSet<T, P>) -> Result<Self> {
        SampleSet::new(raw.y_true, raw.pred_a, raw.pred_b)
    }
}

impl<T, P> SampleSet<T, P> {
    /// Build a sample set, rejecting empty or misaligned columns
    ///
    /// # Example
    /// ```
    /// use bootsig::SampleSet;
    ///
    /// let samples = SampleSet::new(vec![1, 0], vec![1, 0], vec![0, 0]).unwrap();
    /// assert_eq!(samples.len(), 2);
    ///
    /// assert!(SampleSet::new(vec![1, 0], vec![1], vec![0, 0]).is_err());
    /// ```
    pub fn new(y_true: Vec<T>, pred_a: Vec<P>, pred_b: Vec<P>) -> Result<Self> {
        if y_true.is_empty() {
            return Err(BootstrapError::InvalidInput(
                "sample set must contain at least one instance".to_string(),
            ));
        }
        if pred_a.len() != y_true.len() || pred_b.len() != y_true.len() {
            return Err(BootstrapError::InvalidInput(format!(
                "length mismatch: y_true={}, pred_a={}, pred_b={}",
                y_true.len(),
                pred_a.len(),
                pred_b.len()
            )));
        }
        Ok(Self {
            y_true,
            pred_a,
            pred_b,
        })
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    /// Always false: construction rejects empty input
    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }

    pub fn y_true(&self) -> &[T] {
        &self.y_true
    }

    pub fn pred_a(&self) -> &[P] {
        &self.pred_a
    }

    pub fn pred_b(&self) -> &[P] {
        &self.pred_b
    }
}

/// Reusable buffers for one resample at a time
///
/// Workers keep one of these for their whole run, so the hot loop allocates
/// nothing after the first resample.
#[derive(Debug)]
pub struct Resample<T, P = T> {
    indices: Vec<usize>,
    y_true: Vec<T>,
    pred_a: Vec<P>,
    pred_b: Vec<P>,
}

impl<T: Clone, P: Clone> Resample<T, P> {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            indices: Vec::with_capacity(len),
            y_true: Vec::with_capacity(len),
            pred_a: Vec::with_capacity(len),
            pred_b: Vec::with_capacity(len),
        }
    }

    /// Draw `samples.len()` indices uniformly with replacement and gather rows
    pub fn draw<R: Rng>(&mut self, samples: &SampleSet<T, P>, rng: &mut R) {
        let len = samples.len();
        self.indices.clear();
        self.indices.extend((0..len).map(|_| rng.gen_range(0..len)));
        self.gather(samples);
    }

    fn gather(&mut self, samples: &SampleSet<T, P>) {
        self.y_true.clear();
        self.pred_a.clear();
        self.pred_b.clear();
        for &i in &self.indices {
            self.y_true.push(samples.y_true[i].clone());
            self.pred_a.push(samples.pred_a[i].clone());
            self.pred_b.push(samples.pred_b[i].clone());
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn y_true(&self) -> &[T] {
        &self.y_true
    }

    pub fn pred_a(&self) -> &[P] {
        &self.pred_a
    }

    pub fn pred_b(&self) -> &[P] {
        &self.pred_b
    }
}
