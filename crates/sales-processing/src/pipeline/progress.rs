//! Progress reporting for the analysis pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use sales_processing::SalesPipeline;
//!
//! let outcome = SalesPipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the analysis pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the raw CSV
    Loading,
    /// Shape, missing counts and numeric summary of the raw data
    Profiling,
    /// The fixed cleaning steps
    Cleaning,
    /// Total_Sales and calendar columns
    Deriving,
    /// Group-by aggregations
    Analyzing,
    /// Writing output files
    Exporting,
    Complete,
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Profiling => "Profiling Data",
            Self::Cleaning => "Cleaning Data",
            Self::Deriving => "Deriving Columns",
            Self::Analyzing => "Analyzing Sales",
            Self::Exporting => "Exporting Results",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run attributed to this stage.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::Profiling => 0.10,
            Self::Cleaning => 0.35,
            Self::Deriving => 0.10,
            Self::Analyzing => 0.15,
            Self::Exporting => 0.15,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Profiling => 0.15,
            Self::Cleaning => 0.25,
            Self::Deriving => 0.60,
            Self::Analyzing => 0.70,
            Self::Exporting => 0.85,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

/// Receives progress updates while the pipeline runs.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
