//! Lightweight profiling of a sales DataFrame for the console report.
//!
//! Works on both the raw all-string frame and the typed cleaned frame:
//! numeric summaries parse string cells leniently and skip anything that is
//! not a finite number.

use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// count / mean / std / min / max of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Shape plus per-column missing counts of a frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameProfile {
    pub rows: usize,
    pub columns: usize,
    pub missing: Vec<MissingCount>,
}

impl FrameProfile {
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|m| m.missing).sum()
    }
}

/// Profiling entry points.
pub struct DataProfiler;

impl DataProfiler {
    /// Shape and missing counts for every column.
    pub fn profile(df: &DataFrame) -> Result<FrameProfile> {
        Ok(FrameProfile {
            rows: df.height(),
            columns: df.width(),
            missing: Self::missing_counts(df)?,
        })
    }

    /// Nulls, plus blank strings in string columns.
    pub fn missing_counts(df: &DataFrame) -> Result<Vec<MissingCount>> {
        let mut counts = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let missing = if column.dtype() == &DataType::String {
                column
                    .str()?
                    .into_iter()
                    .filter(|v| v.is_none_or(|s| s.trim().is_empty()))
                    .count()
            } else {
                column.null_count()
            };
            counts.push(MissingCount {
                column: column.name().to_string(),
                missing,
            });
        }
        Ok(counts)
    }

    /// Summaries for the named columns that exist in `df`.
    pub fn numeric_summaries(df: &DataFrame, columns: &[&str]) -> Result<Vec<NumericSummary>> {
        let mut summaries = Vec::with_capacity(columns.len());
        for &name in columns {
            let Ok(column) = df.column(name) else {
                continue;
            };
            let values = numeric_values(column.as_materialized_series())?;
            summaries.push(summarize(name, &values));
        }
        Ok(summaries)
    }
}

/// Finite numeric values of a column, skipping nulls and unparseable text.
fn numeric_values(series: &Series) -> Result<Float64Chunked> {
    let values: Vec<f64> = if series.dtype() == &DataType::String {
        series
            .str()?
            .into_iter()
            .flatten()
            .filter_map(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect()
    } else {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect()
    };
    Ok(Float64Chunked::from_vec(series.name().clone(), values))
}

/// Missing statistics are reported as NaN.
pub(crate) fn summarize(name: &str, values: &Float64Chunked) -> NumericSummary {
    NumericSummary {
        column: name.to_string(),
        count: values.len(),
        mean: values.mean().unwrap_or(f64::NAN),
        std: values.std(1).unwrap_or(f64::NAN),
        min: values.min().unwrap_or(f64::NAN),
        max: values.max().unwrap_or(f64::NAN),
    }
}
