//! Sales Data Generation, Cleaning and Analysis
//!
//! A batch library built on Polars for synthesizing messy sales data and for
//! turning it back into clean, aggregated results.
//!
//! # Overview
//!
//! - **Generation**: Synthetic orders with injected defects (missing fields,
//!   inconsistent casing, invalid emails, duplicate rows)
//! - **Cleaning**: A fixed sequence of steps that fills, filters,
//!   deduplicates, normalizes, parses and repairs the raw data
//! - **Derivation**: Total_Sales, Month, Month_Name and Quarter
//! - **Analysis**: Revenue by Region, Product, Sales_Rep, month and quarter
//! - **Reporting**: A console report, three CSV exports and an optional JSON report
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sales_processing::{AnalyzerConfig, DataGenerator, GeneratorConfig, SalesPipeline};
//!
//! // Write data/messy_sales_data.csv
//! let config = GeneratorConfig::builder().seed(42).build()?;
//! DataGenerator::new(config).write_csv()?;
//!
//! // Clean, analyze and export to output/
//! let outcome = SalesPipeline::builder()
//!     .config(AnalyzerConfig::default())
//!     .build()?
//!     .run()?;
//!
//! println!("Top region: {:?}", outcome.analysis.top_region());
//! ```
//!
//! # Errors
//!
//! Rows missing a required field are dropped and counted in the
//! [`CleaningReport`]. Every other problem, such as an unparseable date or
//! quantity, is returned as a [`SalesError`] and stops the run.

pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod derive;
pub mod error;
pub mod generator;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod schema;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{GroupTotal, OverallMetrics, RepPerformance, SalesAnalysis, SalesAnalyzer};
pub use cleaner::{CleaningReport, NormalizedValues, SalesCleaner};
pub use config::{
    AnalyzerConfig, AnalyzerConfigBuilder, ConfigValidationError, DefectRates, GeneratorConfig,
    GeneratorConfigBuilder,
};
pub use derive::{add_time_components, add_total_sales, derive_all};
pub use error::{Result as SalesResult, ResultExt, SalesError};
pub use generator::{DataGenerator, DefectCounts, GenerationSummary};
pub use io::{read_raw_csv, write_csv};
pub use pipeline::{
    ClosureProgressReporter, OutputFiles, PipelineOutcome, PipelineStage, ProgressReporter,
    ProgressUpdate, SalesPipeline, SalesPipelineBuilder,
};
pub use profiler::{DataProfiler, FrameProfile, MissingCount, NumericSummary};
pub use reporting::{Highlights, SalesReport};
pub use schema::RawSalesRecord;
