//! End-to-end analysis pipeline.
//!
//! Load the raw CSV, profile it, clean it, derive computed columns, aggregate
//! and write every output file. A failure at any stage aborts the run before
//! the next stage starts; files already written are left as they are.

pub mod progress;

pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};

use crate::analysis::{SalesAnalysis, SalesAnalyzer};
use crate::cleaner::{CleaningReport, SalesCleaner};
use crate::config::AnalyzerConfig;
use crate::derive::derive_all;
use crate::error::Result;
use crate::io::{read_raw_csv, write_csv};
use crate::profiler::{DataProfiler, FrameProfile, NumericSummary};
use crate::reporting::SalesReport;
use crate::schema::{DISCOUNT, QUANTITY, UNIT_PRICE};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Columns summarized in the raw-data profile.
pub const SUMMARY_COLUMNS: [&str; 3] = [QUANTITY, UNIT_PRICE, DISCOUNT];

/// Paths of the files written by a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFiles {
    pub clean_data: PathBuf,
    pub by_region: PathBuf,
    pub by_product: PathBuf,
    pub report: Option<PathBuf>,
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub input_path: PathBuf,
    pub raw_profile: FrameProfile,
    /// First rows of the raw data, as loaded.
    pub raw_preview: DataFrame,
    pub raw_summaries: Vec<NumericSummary>,
    pub cleaning: CleaningReport,
    pub clean_profile: FrameProfile,
    /// Cleaned data with the derived columns appended.
    pub data: DataFrame,
    pub analysis: SalesAnalysis,
    pub outputs: OutputFiles,
    pub duration_ms: u64,
}

/// The analysis pipeline.
///
/// ```rust,ignore
/// let outcome = SalesPipeline::builder()
///     .config(AnalyzerConfig::builder().output_dir("results").build()?)
///     .build()?
///     .run()?;
/// println!("Revenue: {}", outcome.analysis.overall.total_revenue);
/// ```
pub struct SalesPipeline {
    config: AnalyzerConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: SalesCleaner,
    analyzer: SalesAnalyzer,
}

// Callers may move a built pipeline onto a worker thread.
static_assertions::assert_impl_all!(SalesPipeline: Send);

impl SalesPipeline {
    pub fn builder() -> SalesPipelineBuilder {
        SalesPipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run every stage against the configured input file.
    pub fn run(&self) -> Result<PipelineOutcome> {
        match self.run_internal() {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn finish_stage(&self, stage: PipelineStage, message: impl Into<String>) {
        self.report_progress(ProgressUpdate::new(stage, 1.0, message));
    }

    fn run_internal(&self) -> Result<PipelineOutcome> {
        let start_time = Instant::now();
        let config = &self.config;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            format!("Loading {}...", config.input_path.display()),
        ));
        let raw = read_raw_csv(&config.input_path)?;
        self.finish_stage(
            PipelineStage::Loading,
            format!("Loaded {} rows x {} columns", raw.height(), raw.width()),
        );

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Profiling,
            0.0,
            "Profiling raw data...",
        ));
        let raw_profile = DataProfiler::profile(&raw)?;
        let raw_summaries = DataProfiler::numeric_summaries(&raw, &SUMMARY_COLUMNS)?;
        let raw_preview = raw.head(Some(config.preview_rows));
        info!(
            "Raw data: {} rows x {} columns, {} missing cells",
            raw_profile.rows,
            raw_profile.columns,
            raw_profile.total_missing()
        );
        self.finish_stage(PipelineStage::Profiling, "Profiled raw data");

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            0.0,
            "Cleaning data...",
        ));
        let (cleaned, cleaning) = self.cleaner.clean(raw)?;
        let clean_profile = DataProfiler::profile(&cleaned)?;
        self.finish_stage(
            PipelineStage::Cleaning,
            format!("{} rows remain after cleaning", cleaned.height()),
        );

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Deriving,
            0.0,
            "Deriving Total_Sales and calendar columns...",
        ));
        let mut data = derive_all(cleaned)?;
        self.finish_stage(PipelineStage::Deriving, "Derived columns added");

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Analyzing,
            0.0,
            "Aggregating sales...",
        ));
        let analysis = self.analyzer.analyze(&data)?;
        self.finish_stage(PipelineStage::Analyzing, "Aggregations computed");

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Exporting,
            0.0,
            "Writing output files...",
        ));
        let mut outputs = OutputFiles {
            clean_data: config.clean_output_path(),
            by_region: config.region_output_path(),
            by_product: config.product_output_path(),
            report: None,
        };
        write_csv(&mut data, &outputs.clean_data)?;
        write_csv(&mut analysis.region_frame()?, &outputs.by_region)?;
        write_csv(&mut analysis.product_frame()?, &outputs.by_product)?;

        let mut outcome = PipelineOutcome {
            input_path: config.input_path.clone(),
            raw_profile,
            raw_preview,
            raw_summaries,
            cleaning,
            clean_profile,
            data,
            analysis,
            outputs: outputs.clone(),
            duration_ms: 0,
        };

        if config.emit_report {
            let report_path = config.report_output_path();
            SalesReport::from_outcome(&outcome).write_to_file(&report_path)?;
            outputs.report = Some(report_path);
        }

        self.finish_stage(PipelineStage::Exporting, "Output files written");

        outcome.outputs = outputs;
        outcome.duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Analysis finished in {}ms", outcome.duration_ms);
        Ok(outcome)
    }
}

/// Builder for [`SalesPipeline`].
#[derive(Default)]
pub struct SalesPipelineBuilder {
    config: Option<AnalyzerConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl SalesPipelineBuilder {
    pub fn config(mut self, config: AnalyzerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Validate the configuration and build the pipeline.
    pub fn build(self) -> Result<SalesPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(SalesPipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner: SalesCleaner,
            analyzer: SalesAnalyzer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SalesError;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const RAW: &str = "\
Order_ID,Date,Product,Quantity,Unit_Price,Region,Sales_Rep,Customer_Email,Discount
ORD001,2024-01-15,Laptop,2,100.00,north,John Doe,customer0@email.com,0.1
ORD002,2024-04-02,Mouse,10,20.00,  South ,jane smith,INVALID,
ORD002,2024-04-02,Mouse,10,20.00,  South ,jane smith,INVALID,
,2024-05-01,Webcam,1,50.00,East,Bob Johnson,customer3@email.com,0.2
";

    fn setup(raw: &str) -> (TempDir, AnalyzerConfig) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("raw.csv");
        fs::write(&input, raw).unwrap();
        let config = AnalyzerConfig::builder()
            .input_path(input)
            .output_dir(dir.path().join("out"))
            .build()
            .unwrap();
        (dir, config)
    }

    #[test]
    fn test_run_writes_all_outputs() {
        let (_dir, config) = setup(RAW);
        let outcome = SalesPipeline::builder().config(config).build().unwrap().run().unwrap();

        assert!(outcome.outputs.clean_data.exists());
        assert!(outcome.outputs.by_region.exists());
        assert!(outcome.outputs.by_product.exists());
        assert!(outcome.outputs.report.is_none());

        assert_eq!(outcome.raw_profile.rows, 4);
        assert_eq!(outcome.cleaning.missing_rows_dropped, 1);
        assert_eq!(outcome.cleaning.duplicates_removed, 1);
        assert_eq!(outcome.data.shape(), (2, 13));
        assert!((outcome.analysis.overall.total_revenue - 380.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_emits_json_report_when_requested() {
        let (dir, _) = setup(RAW);
        let config = AnalyzerConfig::builder()
            .input_path(dir.path().join("raw.csv"))
            .output_dir(dir.path().join("out"))
            .emit_report(true)
            .build()
            .unwrap();

        let outcome = SalesPipeline::builder().config(config).build().unwrap().run().unwrap();
        let report_path = outcome.outputs.report.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(json["cleaning"]["rows_after"], 2);
    }

    #[test]
    fn test_progress_ends_with_complete() {
        let (_dir, config) = setup(RAW);
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);

        SalesPipeline::builder()
            .config(config)
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap()
            .run()
            .unwrap();

        let stages = stages.lock().unwrap();
        assert_eq!(stages.first(), Some(&PipelineStage::Loading));
        assert_eq!(stages.last(), Some(&PipelineStage::Complete));
    }

    #[test]
    fn test_every_stage_reports_its_start_and_end() {
        let (_dir, config) = setup(RAW);
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);

        SalesPipeline::builder()
            .config(config)
            .on_progress(move |update| sink.lock().unwrap().push(update))
            .build()
            .unwrap()
            .run()
            .unwrap();

        let updates = updates.lock().unwrap();
        for pair in updates.windows(2) {
            assert!(pair[1].progress + 1e-6 >= pair[0].progress);
        }

        for stage in [
            PipelineStage::Loading,
            PipelineStage::Profiling,
            PipelineStage::Cleaning,
            PipelineStage::Deriving,
            PipelineStage::Analyzing,
            PipelineStage::Exporting,
        ] {
            let seen: Vec<f32> = updates
                .iter()
                .filter(|u| u.stage == stage)
                .map(|u| u.stage_progress)
                .collect();
            assert_eq!(seen, vec![0.0, 1.0], "{stage:?}");

            let last = updates.iter().rfind(|u| u.stage == stage).unwrap();
            assert!((last.progress - (stage.base_progress() + stage.weight())).abs() < 1e-6);
        }
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let config = AnalyzerConfig::builder()
            .input_path(dir.path().join("absent.csv"))
            .output_dir(dir.path().join("out"))
            .build()
            .unwrap();

        let err = SalesPipeline::builder().config(config).build().unwrap().run().unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_malformed_quantity_aborts_before_export() {
        let raw = "\
Order_ID,Date,Product,Quantity,Unit_Price,Region,Sales_Rep,Customer_Email,Discount
ORD001,2024-01-15,Laptop,two,100.00,North,John Doe,customer0@email.com,0.1
";
        let (dir, config) = setup(raw);
        let err = SalesPipeline::builder().config(config).build().unwrap().run().unwrap_err();

        assert!(matches!(err, SalesError::Parse { .. }));
        assert!(!dir.path().join("out").exists());
    }
}
