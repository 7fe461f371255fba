//! Run reports.
//!
//! [`console`] renders the human-readable report printed by `sales-analyze`.
//! [`SalesReport`] is the machine-readable form written with `--emit-report`.
//!
//! ```rust,ignore
//! let outcome = SalesPipeline::builder().build()?.run()?;
//! console::print_analysis_report(&outcome);
//!
//! let report = SalesReport::from_outcome(&outcome);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod console;

use crate::analysis::{GroupTotal, SalesAnalysis};
use crate::cleaner::CleaningReport;
use crate::error::{Result, ResultExt};
use crate::pipeline::{OutputFiles, PipelineOutcome};
use crate::profiler::{FrameProfile, NumericSummary};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Headline answers pulled out of the aggregations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlights {
    pub top_region: Option<GroupTotal<String>>,
    pub top_product: Option<GroupTotal<String>>,
    pub best_month: Option<GroupTotal<String>>,
}

/// Complete JSON run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    // Metadata
    /// Local time the report was generated (RFC 3339)
    pub generated_at: String,
    pub input_file: String,
    pub outputs: OutputFiles,
    pub duration_ms: u64,

    // Data quality
    pub raw_profile: FrameProfile,
    pub raw_summaries: Vec<NumericSummary>,
    pub cleaning: CleaningReport,
    pub clean_profile: FrameProfile,

    // Results
    pub highlights: Highlights,
    pub analysis: SalesAnalysis,
}

impl SalesReport {
    pub fn from_outcome(outcome: &PipelineOutcome) -> Self {
        let analysis = &outcome.analysis;
        Self {
            generated_at: Local::now().to_rfc3339(),
            input_file: outcome.input_path.display().to_string(),
            outputs: outcome.outputs.clone(),
            duration_ms: outcome.duration_ms,
            raw_profile: outcome.raw_profile.clone(),
            raw_summaries: outcome.raw_summaries.clone(),
            cleaning: outcome.cleaning.clone(),
            clean_profile: outcome.clean_profile.clone(),
            highlights: Highlights {
                top_region: analysis.top_region().cloned(),
                top_product: analysis.top_product().cloned(),
                best_month: analysis.best_month().cloned(),
            },
            analysis: analysis.clone(),
        }
    }

    /// Write as pretty-printed JSON, replacing any existing file.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
        }

        let mut file = File::create(path).context(format!("Failed to create {}", path.display()))?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())
            .context(format!("Failed to write {}", path.display()))?;

        info!("Report saved: {}", path.display());
        Ok(())
    }
}
