// Configuration for bootstrap significance testing
//
// The resample count trades Monte Carlo error for run time: the standard
// error of the p-value estimate shrinks as 1/sqrt(resamples).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 100_000;

/// Below this many resamples the p-value estimate is too noisy to trust
pub const MIN_RECOMMENDED_RESAMPLES: usize = 1_000;

/// Configuration for a bootstrap significance test
///
/// # Example
/// ```
/// use bootsig::bootstrap::BootstrapConfig;
///
/// let config = BootstrapConfig::default();
/// assert_eq!(config.resamples, 100_000);
/// assert_eq!(config.significance_level, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Number of bootstrap resamples (`n`)
    ///
    /// Each resample costs two metric evaluations on `L` rows.
    pub resamples: usize,

    /// Seed for the random source
    ///
    /// `None` seeds from OS entropy; two runs will then differ slightly.
    /// Set a seed for reproducible p-values.
    pub seed: Option<u64>,

    /// Number of worker threads sharing the resamples
    ///
    /// With a fixed seed, results are reproducible for a fixed worker count.
    /// Changing the worker count changes which random stream feeds which
    /// resample, so the estimate moves within its Monte Carlo error.
    pub workers: usize,

    /// Significance level (alpha) used to turn the p-value into a verdict
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter
    /// - 0.10: looser
    pub significance_level: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            seed: None,
            workers: 1,
            significance_level: 0.05,
        }
    }
}

impl BootstrapConfig {
    /// Fast, noisier configuration for exploratory runs
    pub fn quick() -> Self {
        Self {
            resamples: 10_000,
            ..Self::default()
        }
    }

    /// Tighter estimate spread over all available cores
    pub fn thorough() -> Self {
        Self {
            resamples: 1_000_000,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            significance_level: 0.01,
            ..Self::default()
        }
    }

    pub fn with_resamples(mut self, resamples: usize) -> Self {
        self.resamples = resamples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    /// Load configuration from a TOML file
    ///
    /// Missing keys fall back to [`BootstrapConfig::default`].
    ///
    /// # Example TOML
    /// ```toml
    /// resamples = 50000
    /// seed = 42
    /// workers = 4
    /// significance_level = 0.01
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;
        let config: Self = toml::from_str(&content).with_context(|| {
            format!("Failed to parse TOML config: {}", path.as_ref().display())
        })?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resamples == 0 {
            return Err("resamples must be >= 1, got 0".to_string());
        }

        if self.workers == 0 {
            return Err("workers must be >= 1, got 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(format!(
                "significance_level must be in [0, 1], got {}",
                self.significance_level
            ));
        }

        Ok(())
    }
}
