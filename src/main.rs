use anyhow::{Context, Result};
use bootsig::bootstrap::{BootstrapConfig, BootstrapTester, SignificanceReport};
use bootsig::cli::{Cli, OutputFormat};
use bootsig::data::load_samples;
use bootsig::metrics::{ClassificationSummary, MetricKind, RegressionSummary};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Per-model summaries, rendered for both output formats
struct Summaries {
    text: String,
    json: serde_json::Value,
}

impl Summaries {
    fn new<S: Serialize>(model_a: &S, model_b: &S, render: impl Fn(&S) -> String) -> Result<Self> {
        let mut json = serde_json::Map::new();
        json.insert("model_a".to_string(), serde_json::to_value(model_a)?);
        json.insert("model_b".to_string(), serde_json::to_value(model_b)?);
        Ok(Self {
            text: format!("Model A:\n{}Model B:\n{}", render(model_a), render(model_b)),
            json: serde_json::Value::Object(json),
        })
    }
}

/// Load the sample set with the value type the metric expects and run the test
fn run_test(
    args: &Cli,
    tester: &BootstrapTester,
) -> Result<(SignificanceReport, Option<Summaries>)> {
    if let Some(metric) = args.metric.label_metric() {
        let samples = load_samples::<String, _>(&args.input)?;
        let report = tester.test(&samples, &*metric)?;
        let summaries = if args.summary {
            let a = ClassificationSummary::evaluate(samples.y_true(), samples.pred_a())?;
            let b = ClassificationSummary::evaluate(samples.y_true(), samples.pred_b())?;
            Some(Summaries::new(&a, &b, |s: &ClassificationSummary<String>| {
                s.to_report_string()
            })?)
        } else {
            None
        };
        Ok((report, summaries))
    } else if let Some(metric) = args.metric.numeric_metric() {
        let samples = load_samples::<f64, _>(&args.input)?;
        let report = tester.test(&samples, &*metric)?;
        let summaries = if args.summary {
            let a = RegressionSummary::evaluate(samples.y_true(), samples.pred_a())?;
            let b = RegressionSummary::evaluate(samples.y_true(), samples.pred_b())?;
            Some(Summaries::new(&a, &b, RegressionSummary::to_report_string)?)
        } else {
            None
        };
        Ok((report, summaries))
    } else {
        anyhow::bail!("Metric '{}' has no implementation", args.metric);
    }
}

fn print_report(
    report: &SignificanceReport,
    summaries: Option<&Summaries>,
    metric: MetricKind,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Metric: {}", metric);
            if let Some(summaries) = summaries {
                println!("\n📋 Model summaries:");
                println!("{}", summaries.text);
            }
            print!("{}", report.to_report_string());
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(report).context("Failed to serialize report")?;
            value["metric"] = serde_json::Value::String(metric.to_string());
            if let Some(summaries) = summaries {
                value["summary"] = summaries.json.clone();
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let base = match &args.config {
        Some(path) => BootstrapConfig::from_toml(path)?,
        None => BootstrapConfig::default(),
    };
    let config = args.apply_overrides(base);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let tester = BootstrapTester::new(config);
    let (report, summaries) = run_test(&args, &tester)
        .with_context(|| format!("Bootstrap test failed for {}", args.input.display()))?;

    print_report(&report, summaries.as_ref(), args.metric, args.format)
}
