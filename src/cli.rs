//! CLI argument parsing for bootsig

use crate::bootstrap::BootstrapConfig;
use crate::metrics::MetricKind;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the significance report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "bootsig")]
#[command(version)]
#[command(
    about = "Bootstrap significance test: is model A better than model B?",
    long_about = None
)]
pub struct Cli {
    /// Predictions file (.json or .csv) with y_true, pred_a and pred_b
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Metric used to score both models
    #[arg(short, long, value_enum)]
    pub metric: MetricKind,

    /// Number of bootstrap resamples (default: 100000)
    #[arg(short = 'n', long, value_name = "N")]
    pub resamples: Option<usize>,

    /// Seed for reproducible p-values
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Worker threads sharing the resamples (default: 1)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Significance level for the verdict (default: 0.05)
    #[arg(short, long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// TOML config file; command-line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also report every built-in score of each model (confusion matrix for labels)
    #[arg(long)]
    pub summary: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply_overrides(&self, mut config: BootstrapConfig) -> BootstrapConfig {
        if let Some(resamples) = self.resamples {
            config.resamples = resamples;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(alpha) = self.alpha {
            config.significance_level = alpha;
        }
        config
    }
}
