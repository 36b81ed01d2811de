// Significance verdict and report for a bootstrap comparison
//
// The p-value answers one directional question: is model A better than
// model B? A large p-value is not evidence that B is better, only that A's
// advantage is not robust under resampling.

use serde::{Deserialize, Serialize};

/// Outcome of comparing the p-value with the significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceVerdict {
    /// p < alpha and A scored higher: evidence that A outperforms B
    ASignificantlyBetter,
    /// p >= alpha, or A did not score higher on the full data
    NotSignificant,
}

/// Full result of one bootstrap significance test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceReport {
    /// Estimated one-sided p-value, in [0, 1]
    pub p_value: f64,

    /// Metric score of model A on the full data
    pub score_a: f64,

    /// Metric score of model B on the full data
    pub score_b: f64,

    /// Doubled observed effect, `2 * (score_a - score_b)`
    pub observed_effect: f64,

    /// Resamples whose effect strictly exceeded the observed effect
    pub exceed_count: usize,

    /// Number of resamples drawn
    pub resamples: usize,

    /// Number of instances in the sample set
    pub sample_size: usize,

    /// Alpha the verdict was decided against
    pub significance_level: f64,

    /// Seed the resamples were drawn from, configured or drawn from entropy;
    /// `None` when the caller supplied the random source
    pub seed: Option<u64>,

    pub verdict: SignificanceVerdict,
}

impl SignificanceReport {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        score_a: f64,
        score_b: f64,
        observed_effect: f64,
        exceed_count: usize,
        resamples: usize,
        sample_size: usize,
        significance_level: f64,
        seed: Option<u64>,
    ) -> Self {
        let p_value = exceed_count as f64 / resamples as f64;
        // A tie also yields p = 0; without an observed advantage there is
        // nothing to call significant.
        let verdict = if p_value < significance_level && observed_effect > 0.0 {
            SignificanceVerdict::ASignificantlyBetter
        } else {
            SignificanceVerdict::NotSignificant
        };

        Self {
            p_value,
            score_a,
            score_b,
            observed_effect,
            exceed_count,
            resamples,
            sample_size,
            significance_level,
            seed,
            verdict,
        }
    }

    pub fn is_significant(&self) -> bool {
        self.verdict == SignificanceVerdict::ASignificantlyBetter
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match self.verdict {
            SignificanceVerdict::ASignificantlyBetter => {
                report.push_str("✅ MODEL A SIGNIFICANTLY BETTER THAN MODEL B\n\n");
            }
            SignificanceVerdict::NotSignificant => {
                report.push_str("⚠️  NO SIGNIFICANT ADVANTAGE FOR MODEL A\n\n");
            }
        }

        report.push_str(&format!("p-value: {:.6}\n", self.p_value));
        report.push_str(&format!(
            "Significance level: {} ({}% confidence)\n",
            self.significance_level,
            (1.0 - self.significance_level) * 100.0
        ));

        report.push_str("\n📊 Scores:\n");
        report.push_str(&format!("  model A: {:.6}\n", self.score_a));
        report.push_str(&format!("  model B: {:.6}\n", self.score_b));
        report.push_str(&format!(
            "  doubled observed effect: {:.6}\n",
            self.observed_effect
        ));

        report.push_str("\n🔁 Bootstrap:\n");
        report.push_str(&format!("  samples: {}\n", self.sample_size));
        report.push_str(&format!("  resamples: {}\n", self.resamples));
        report.push_str(&format!(
            "  resamples exceeding observed effect: {}\n",
            self.exceed_count
        ));
        if let Some(seed) = self.seed {
            report.push_str(&format!("  seed: {}\n", seed));
        }

        report
    }
}
