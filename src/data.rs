//! Loading sample sets from prediction files
//!
//! Two layouts are accepted:
//!
//! - JSON: `{"y_true": [...], "pred_a": [...], "pred_b": [...]}`
//! - CSV: a header row, then one `y_true,pred_a,pred_b` row per instance.
//!   Columns are matched by header name when all three names are present,
//!   otherwise by position.
//!
//! Values are read either as labels or as real numbers. Labels are compared
//! as text, so numeric labels are brought to one canonical form first: a
//! whole number reads the same whether written `1`, `1.0` or ` 1 `.

use crate::sample::SampleSet;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

const COLUMNS: [&str; 3] = ["y_true", "pred_a", "pred_b"];

/// File layout of a predictions file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Detect the layout from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(InputFormat::Json),
            Some("csv") => Ok(InputFormat::Csv),
            _ => anyhow::bail!(
                "Cannot infer input format from '{}' (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

/// A value that can be read from a predictions file
pub trait Cell: Sized {
    fn from_text(text: &str) -> Result<Self>;
    fn from_json(value: &Value) -> Result<Self>;
}

/// Canonical text of a label; whole numbers lose any fractional part
fn canonical_label(text: &str) -> String {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER => {
            format!("{}", n as i64)
        }
        _ => text.to_string(),
    }
}

/// Largest magnitude below which every whole f64 is exact
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Cell for String {
    fn from_text(text: &str) -> Result<Self> {
        Ok(canonical_label(text))
    }

    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(canonical_label(s)),
            Value::Number(n) => Ok(canonical_label(&n.to_string())),
            Value::Bool(b) => Ok(b.to_string()),
            other => anyhow::bail!("Expected a label, found {}", other),
        }
    }
}

impl Cell for f64 {
    fn from_text(text: &str) -> Result<Self> {
        text.trim()
            .parse()
            .with_context(|| format!("Invalid number: '{}'", text))
    }

    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .with_context(|| format!("Number out of range: {}", n)),
            Value::String(s) => Self::from_text(s),
            other => anyhow::bail!("Expected a number, found {}", other),
        }
    }
}

/// Load a sample set, choosing the parser from the file extension
pub fn load_samples<C: Cell, P: AsRef<Path>>(path: P) -> Result<SampleSet<C>> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let samples = match format {
        InputFormat::Json => parse_json(&content),
        InputFormat::Csv => parse_csv(&content),
    }
    .with_context(|| format!("Failed to parse input file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        instances = samples.len(),
        "loaded sample set"
    );
    Ok(samples)
}

/// Parse the JSON layout
pub fn parse_json<C: Cell>(content: &str) -> Result<SampleSet<C>> {
    let root: Value = serde_json::from_str(content).context("Invalid JSON")?;
    let object = root
        .as_object()
        .context("Expected a JSON object with y_true, pred_a and pred_b")?;

    let mut columns = Vec::with_capacity(COLUMNS.len());
    for name in COLUMNS {
        let values = object
            .get(name)
            .and_then(Value::as_array)
            .with_context(|| format!("Missing array field '{}'", name))?;
        let column = values
            .iter()
            .enumerate()
            .map(|(i, v)| C::from_json(v).with_context(|| format!("{}[{}]", name, i)))
            .collect::<Result<Vec<C>>>()?;
        columns.push(column);
    }

    into_samples(columns)
}

/// Parse the CSV layout
pub fn parse_csv<C: Cell>(content: &str) -> Result<SampleSet<C>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let header = reader.headers().context("Invalid CSV header")?.clone();
    if header.len() != COLUMNS.len() {
        anyhow::bail!(
            "CSV header must have 3 columns (y_true,pred_a,pred_b), found {}",
            header.len()
        );
    }
    let order = column_order(&header);

    let mut columns: Vec<Vec<C>> = vec![Vec::new(), Vec::new(), Vec::new()];
    for record in reader.records() {
        let record = record.context("Invalid CSV record")?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != COLUMNS.len() {
            anyhow::bail!("line {}: expected 3 fields, found {}", line, record.len());
        }
        for (column, &field_idx) in columns.iter_mut().zip(&order) {
            let value =
                C::from_text(&record[field_idx]).with_context(|| format!("line {}", line))?;
            column.push(value);
        }
    }

    into_samples(columns)
}

/// Field index for each of y_true, pred_a, pred_b
fn column_order(header: &csv::StringRecord) -> [usize; 3] {
    let by_name: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|name| header.iter().position(|h| h == *name))
        .collect();

    match by_name.as_slice() {
        [Some(t), Some(a), Some(b)] => [*t, *a, *b],
        _ => [0, 1, 2],
    }
}

fn into_samples<C>(columns: Vec<Vec<C>>) -> Result<SampleSet<C>> {
    let mut columns = columns.into_iter();
    let (Some(y_true), Some(pred_a), Some(pred_b)) =
        (columns.next(), columns.next(), columns.next())
    else {
        anyhow::bail!("Expected three columns");
    };
    Ok(SampleSet::new(y_true, pred_a, pred_b)?)
}
