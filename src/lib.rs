//! bootsig - Bootstrap significance testing for model comparison
//!
//! This library estimates whether model A statistically outperforms model B
//! on the same held-out data, with any caller-supplied metric, using the
//! paired bootstrap with a doubled observed effect as the null threshold.

pub mod bootstrap;
pub mod cli;
pub mod data;
pub mod error;
pub mod metric;
pub mod metrics;
pub mod sample;

pub use bootstrap::{BootstrapConfig, BootstrapTester, SignificanceReport};
pub use error::{BootstrapError, MetricError};
pub use metric::Metric;
pub use sample::SampleSet;
