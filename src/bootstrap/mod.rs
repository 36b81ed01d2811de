// Bootstrap significance testing for paired model comparison
//
// Estimates a one-sided p-value for "model A is better than model B" on the
// same evaluation set, with any metric, by resampling instances with
// replacement. No distributional assumptions about the metric are made.
//
// Scientific Foundation:
// [1] Berg-Kirkpatrick, T., Burkett, D., & Klein, D. (2012). An empirical
//     investigation of statistical significance in NLP. EMNLP-CoNLL.
//     Section 2.2: paired bootstrap, null calibrated at twice the observed
//     effect.
// [2] Efron, B., & Tibshirani, R. (1993). An Introduction to the Bootstrap.
//
// Implementation:
// - Random source is always explicit: seeded ChaCha8 or caller-injected Rng
// - Parallel workers use disjoint ChaCha8 streams and merge partial counts
// - Metric failures abort the run; nothing is skipped

mod cancel;
mod config;
mod report;
mod tester;

pub use cancel::CancellationToken;
pub use config::{BootstrapConfig, DEFAULT_RESAMPLES, MIN_RECOMMENDED_RESAMPLES};
pub use report::{SignificanceReport, SignificanceVerdict};
pub use tester::{bootstrap_significance_test, BootstrapTester};
