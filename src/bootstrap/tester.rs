// Paired bootstrap significance test for "model A is better than model B"
//
// Both models are scored on the full data, then on `n` resamples drawn with
// replacement. The null is calibrated against twice the observed effect
// rather than against zero: resampled effects are centred on the observed
// one, so shifting by it once more approximates the null distribution
// without simulating it (Berg-Kirkpatrick et al., 2012, section 2.2).
//
//   d   = 2 * (metric(y, A) - metric(y, B))
//   d_i = metric(y_i, A_i) - metric(y_i, B_i)
//   p   = #{ i : d_i > d } / n
//
// The comparison is strict. Identical predictions give d = 0 and d_i = 0 on
// every resample, hence p = 0.

use crate::bootstrap::cancel::CancellationToken;
use crate::bootstrap::config::{BootstrapConfig, MIN_RECOMMENDED_RESAMPLES};
use crate::bootstrap::report::SignificanceReport;
use crate::error::{BootstrapError, EvaluationStage, Result};
use crate::metric::Metric;
use crate::sample::{Resample, SampleSet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scores of both models on the unresampled data
#[derive(Debug, Clone, Copy)]
struct Observed {
    score_a: f64,
    score_b: f64,
    /// Doubled effect the resamples are compared against
    effect: f64,
}

/// Bootstrap significance tester
///
/// # Example
/// ```
/// use bootsig::bootstrap::{BootstrapConfig, BootstrapTester};
/// use bootsig::metrics::Accuracy;
/// use bootsig::SampleSet;
///
/// let samples = SampleSet::new(
///     vec![1, 1, 1, 1, 0, 0, 0, 0],
///     vec![1, 1, 1, 1, 0, 0, 0, 0],
///     vec![0, 0, 0, 0, 1, 1, 1, 1],
/// )
/// .unwrap();
///
/// let tester = BootstrapTester::new(BootstrapConfig::default().with_resamples(1000).with_seed(7));
/// let report = tester.test(&samples, &Accuracy).unwrap();
/// assert_eq!(report.p_value, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BootstrapTester {
    config: BootstrapConfig,
}

impl BootstrapTester {
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Run the test with the configured seed and worker count
    pub fn test<T, P, M>(&self, samples: &SampleSet<T, P>, metric: &M) -> Result<SignificanceReport>
    where
        T: Clone + Sync,
        P: Clone + Sync,
        M: Metric<T, P> + Sync + ?Sized,
    {
        self.test_cancellable(samples, metric, &CancellationToken::new())
    }

    /// Run the test, stopping early if `token` is cancelled
    ///
    /// A cancelled run returns [`BootstrapError::Cancelled`]; no partial
    /// p-value is reported.
    pub fn test_cancellable<T, P, M>(
        &self,
        samples: &SampleSet<T, P>,
        metric: &M,
        token: &CancellationToken,
    ) -> Result<SignificanceReport>
    where
        T: Clone + Sync,
        P: Clone + Sync,
        M: Metric<T, P> + Sync + ?Sized,
    {
        self.check_config()?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        tracing::debug!(
            resamples = self.config.resamples,
            workers = self.config.workers,
            samples = samples.len(),
            seed,
            "starting bootstrap significance test"
        );

        let observed = observe(samples, metric)?;
        let exceed_count = if self.config.workers == 1 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            count_exceedances(
                samples,
                metric,
                observed.effect,
                0..self.config.resamples,
                &mut rng,
                || token.is_cancelled(),
            )?
        } else {
            count_parallel(samples, metric, observed.effect, &self.config, seed, token)?
        };

        Ok(self.finish(samples, observed, exceed_count, Some(seed)))
    }

    /// Run the test sequentially with a caller-supplied random source
    ///
    /// Ignores the configured seed and worker count. Two calls with
    /// identically seeded sources produce bit-identical reports.
    pub fn test_with_rng<T, P, M, R>(
        &self,
        samples: &SampleSet<T, P>,
        metric: &M,
        rng: &mut R,
    ) -> Result<SignificanceReport>
    where
        T: Clone,
        P: Clone,
        M: Metric<T, P> + ?Sized,
        R: Rng,
    {
        self.check_config()?;
        let observed = observe(samples, metric)?;
        let exceed_count = count_exceedances(
            samples,
            metric,
            observed.effect,
            0..self.config.resamples,
            rng,
            || false,
        )?;
        Ok(self.finish(samples, observed, exceed_count, None))
    }

    fn check_config(&self) -> Result<()> {
        self.config.validate().map_err(BootstrapError::InvalidInput)?;
        if self.config.resamples < MIN_RECOMMENDED_RESAMPLES {
            tracing::warn!(
                "only {} resamples requested; the p-value estimate will be noisy (>= {} recommended)",
                self.config.resamples,
                MIN_RECOMMENDED_RESAMPLES
            );
        }
        Ok(())
    }

    fn finish<T, P>(
        &self,
        samples: &SampleSet<T, P>,
        observed: Observed,
        exceed_count: usize,
        seed: Option<u64>,
    ) -> SignificanceReport {
        let report = SignificanceReport::new(
            observed.score_a,
            observed.score_b,
            observed.effect,
            exceed_count,
            self.config.resamples,
            samples.len(),
            self.config.significance_level,
            seed,
        );
        tracing::debug!(
            p_value = report.p_value,
            exceed_count,
            "bootstrap significance test finished"
        );
        report
    }
}

/// Estimate the one-sided bootstrap p-value that A beats B
///
/// Slice-based entry point: validates alignment, then runs `n` resamples
/// drawing from `rng`.
///
/// # Example
/// ```
/// use bootsig::bootstrap::bootstrap_significance_test;
/// use bootsig::metrics::Accuracy;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let y = [0, 1, 1, 0];
/// let a = [0, 1, 1, 0];
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let p = bootstrap_significance_test(&y, &a, &a, &Accuracy, 500, &mut rng).unwrap();
/// assert_eq!(p, 0.0);
/// ```
pub fn bootstrap_significance_test<T, P, M, R>(
    y_true: &[T],
    y_pred_a: &[P],
    y_pred_b: &[P],
    metric: &M,
    n: usize,
    rng: &mut R,
) -> Result<f64>
where
    T: Clone,
    P: Clone,
    M: Metric<T, P> + ?Sized,
    R: Rng,
{
    let samples = SampleSet::new(y_true.to_vec(), y_pred_a.to_vec(), y_pred_b.to_vec())?;
    let tester = BootstrapTester::new(BootstrapConfig::default().with_resamples(n));
    tester
        .test_with_rng(&samples, metric, rng)
        .map(|report| report.p_value)
}

fn evaluate<T, P, M>(metric: &M, truth: &[T], predictions: &[P], stage: EvaluationStage) -> Result<f64>
where
    M: Metric<T, P> + ?Sized,
{
    metric
        .evaluate(truth, predictions)
        .map_err(|source| BootstrapError::MetricEvaluation { stage, source })
}

fn observe<T, P, M>(samples: &SampleSet<T, P>, metric: &M) -> Result<Observed>
where
    M: Metric<T, P> + ?Sized,
{
    let score_a = evaluate(metric, samples.y_true(), samples.pred_a(), EvaluationStage::Observed)?;
    let score_b = evaluate(metric, samples.y_true(), samples.pred_b(), EvaluationStage::Observed)?;
    Ok(Observed {
        score_a,
        score_b,
        effect: 2.0 * (score_a - score_b),
    })
}

/// Count resamples in `range` whose effect strictly exceeds `observed_effect`
///
/// `range` holds global resample numbers so metric failures name the resample
/// that failed. `stop` is polled before each resample.
fn count_exceedances<T, P, M, R>(
    samples: &SampleSet<T, P>,
    metric: &M,
    observed_effect: f64,
    range: std::ops::Range<usize>,
    rng: &mut R,
    stop: impl Fn() -> bool,
) -> Result<usize>
where
    T: Clone,
    P: Clone,
    M: Metric<T, P> + ?Sized,
    R: Rng,
{
    let mut resample = Resample::with_capacity(samples.len());
    let mut exceeded = 0;

    for (completed, i) in range.enumerate() {
        if stop() {
            return Err(BootstrapError::Cancelled { completed });
        }

        resample.draw(samples, rng);
        let stage = EvaluationStage::Resample(i);
        let score_a = evaluate(metric, resample.y_true(), resample.pred_a(), stage)?;
        let score_b = evaluate(metric, resample.y_true(), resample.pred_b(), stage)?;

        if score_a - score_b > observed_effect {
            exceeded += 1;
        }
    }

    Ok(exceeded)
}

/// Split resamples into contiguous chunks, one per worker
///
/// The first `n % workers` chunks take one extra resample.
fn chunk_ranges(resamples: usize, workers: usize) -> Vec<std::ops::Range<usize>> {
    let workers = workers.min(resamples).max(1);
    let base = resamples / workers;
    let extra = resamples % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for k in 0..workers {
        let len = base + usize::from(k < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Map-reduce over worker threads, each with its own random stream
///
/// Worker `k` draws from ChaCha8 stream `k` under the shared seed, so streams
/// never overlap and a fixed (seed, workers) pair reproduces the same count.
/// The first metric failure stops every worker and is returned.
fn count_parallel<T, P, M>(
    samples: &SampleSet<T, P>,
    metric: &M,
    observed_effect: f64,
    config: &BootstrapConfig,
    seed: u64,
    token: &CancellationToken,
) -> Result<usize>
where
    T: Clone + Sync,
    P: Clone + Sync,
    M: Metric<T, P> + Sync + ?Sized,
{
    let ranges = chunk_ranges(config.resamples, config.workers);
    let abort = CancellationToken::new();

    let outcomes: Vec<(usize, Result<usize>)> = crossbeam::scope(|scope| {
        let handles: Vec<_> = ranges
            .iter()
            .cloned()
            .enumerate()
            .map(|(k, range)| {
                let abort = &abort;
                let len = range.len();
                let handle = scope.spawn(move |_| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    rng.set_stream(k as u64);
                    let result = count_exceedances(
                        samples,
                        metric,
                        observed_effect,
                        range,
                        &mut rng,
                        || token.is_cancelled() || abort.is_cancelled(),
                    );
                    if matches!(result, Err(BootstrapError::MetricEvaluation { .. })) {
                        abort.cancel();
                    }
                    result
                });
                (len, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(len, handle)| {
                let result = handle
                    .join()
                    .unwrap_or_else(|panic| Err(BootstrapError::WorkerPanic(panic_message(&*panic))));
                (len, result)
            })
            .collect()
    })
    .map_err(|panic| BootstrapError::WorkerPanic(panic_message(&*panic)))?;

    reduce_outcomes(outcomes)
}

/// Merge per-worker results; metric failures win over cancellation
fn reduce_outcomes(outcomes: Vec<(usize, Result<usize>)>) -> Result<usize> {
    let mut exceeded = 0;
    let mut completed = 0;
    let mut cancelled = false;
    let mut failure = None;

    for (len, outcome) in outcomes {
        match outcome {
            Ok(count) => {
                exceeded += count;
                completed += len;
            }
            Err(BootstrapError::Cancelled { completed: done }) => {
                cancelled = true;
                completed += done;
            }
            Err(err) => {
                failure.get_or_insert(err);
            }
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }
    if cancelled {
        return Err(BootstrapError::Cancelled { completed });
    }
    Ok(exceeded)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
