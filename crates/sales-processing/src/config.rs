//! Configuration types for the generator and the analyzer.
//!
//! Both configs follow the same builder pattern: every setter is optional,
//! `build()` fills in the defaults and validates the result. The defaults
//! reproduce the fixed behavior of the batch jobs, so running either binary
//! with no arguments needs no configuration at all.

use crate::error::SalesError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the messy dataset (generator output, analyzer input).
pub const DEFAULT_RAW_DATA_PATH: &str = "data/messy_sales_data.csv";

/// Default directory for analyzer outputs.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Per-field probabilities of injecting a defect into a generated row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefectRates {
    /// Probability that Order_ID is left empty.
    pub missing_order_id: f64,
    /// Probability that Date is left empty.
    pub missing_date: f64,
    /// Probability that Quantity is left empty.
    pub missing_quantity: f64,
    /// Probability that Unit_Price is left empty.
    pub missing_unit_price: f64,
    /// Probability that Customer_Email is the `INVALID` sentinel.
    pub invalid_email: f64,
    /// Probability that Discount is left empty.
    pub missing_discount: f64,
}

impl Default for DefectRates {
    fn default() -> Self {
        Self {
            missing_order_id: 0.05,
            missing_date: 0.03,
            missing_quantity: 0.07,
            missing_unit_price: 0.04,
            invalid_email: 0.10,
            missing_discount: 0.50,
        }
    }
}

impl DefectRates {
    fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("missing_order_id", self.missing_order_id),
            ("missing_date", self.missing_date),
            ("missing_quantity", self.missing_quantity),
            ("missing_unit_price", self.missing_unit_price),
            ("invalid_email", self.invalid_email),
            ("missing_discount", self.missing_discount),
        ]
    }
}

/// Configuration for the synthetic data generator.
///
/// # Example
///
/// ```rust,ignore
/// use sales_processing::config::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .rows(500)
///     .seed(42)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of distinct records to synthesize.
    /// Default: 200
    pub rows: usize,

    /// Number of exact duplicate rows appended before shuffling.
    /// Default: 10
    pub duplicate_rows: usize,

    /// RNG seed. `None` draws from OS entropy.
    /// Default: None
    pub seed: Option<u64>,

    /// First possible order date.
    /// Default: 2024-01-01
    pub start_date: NaiveDate,

    /// Dates are drawn from `start_date + 0..=date_span_days`.
    /// Default: 365
    pub date_span_days: i64,

    /// Inclusive Quantity range.
    /// Default: (1, 20)
    pub quantity_range: (i64, i64),

    /// Unit_Price range, rounded to cents.
    /// Default: (10.0, 500.0)
    pub unit_price_range: (f64, f64),

    /// Discount range, rounded to 2 places.
    /// Default: (0.0, 0.3)
    pub discount_range: (f64, f64),

    /// Defect injection probabilities.
    pub defect_rates: DefectRates,

    /// Where the CSV is written (overwritten if present).
    /// Default: "data/messy_sales_data.csv"
    pub output_path: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            duplicate_rows: 10,
            seed: None,
            start_date: default_start_date(),
            date_span_days: 365,
            quantity_range: (1, 20),
            unit_price_range: (10.0, 500.0),
            discount_range: (0.0, 0.3),
            defect_rates: DefectRates::default(),
            output_path: PathBuf::from(DEFAULT_RAW_DATA_PATH),
        }
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

impl GeneratorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Total number of rows the generator writes.
    pub fn total_rows(&self) -> usize {
        self.rows + self.duplicate_rows
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.rows == 0 {
            return Err(ConfigValidationError::InvalidRowCount(self.rows));
        }

        for (field, value) in self.defect_rates.fields() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidProbability {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.date_span_days < 0 {
            return Err(ConfigValidationError::InvalidRange {
                field: "date_span_days".to_string(),
                min: 0.0,
                max: self.date_span_days as f64,
            });
        }

        let (qmin, qmax) = self.quantity_range;
        if qmin > qmax {
            return Err(ConfigValidationError::InvalidRange {
                field: "quantity_range".to_string(),
                min: qmin as f64,
                max: qmax as f64,
            });
        }

        for (field, (min, max)) in [
            ("unit_price_range", self.unit_price_range),
            ("discount_range", self.discount_range),
        ] {
            if !(min <= max) {
                return Err(ConfigValidationError::InvalidRange {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }

        if !(0.0..1.0).contains(&self.discount_range.0) || self.discount_range.1 >= 1.0 {
            return Err(ConfigValidationError::InvalidRange {
                field: "discount_range".to_string(),
                min: self.discount_range.0,
                max: self.discount_range.1,
            });
        }

        Ok(())
    }
}

/// Configuration for the cleaner/analyzer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Raw input CSV.
    /// Default: "data/messy_sales_data.csv"
    pub input_path: PathBuf,

    /// Directory receiving every output file.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// File name of the cleaned dataset.
    /// Default: "clean_sales_data.csv"
    pub clean_file_name: String,

    /// File name of the Region aggregation.
    /// Default: "sales_by_region.csv"
    pub region_file_name: String,

    /// File name of the Product aggregation.
    /// Default: "sales_by_product.csv"
    pub product_file_name: String,

    /// File name of the JSON run report.
    /// Default: "sales_report.json"
    pub report_file_name: String,

    /// Whether to write the JSON run report.
    /// Default: false
    pub emit_report: bool,

    /// Rows shown in the console preview of the raw data.
    /// Default: 5
    pub preview_rows: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_RAW_DATA_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            clean_file_name: "clean_sales_data.csv".to_string(),
            region_file_name: "sales_by_region.csv".to_string(),
            product_file_name: "sales_by_product.csv".to_string(),
            report_file_name: "sales_report.json".to_string(),
            emit_report: false,
            preview_rows: 5,
        }
    }
}

impl AnalyzerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalyzerConfigBuilder {
        AnalyzerConfigBuilder::default()
    }

    pub fn clean_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.clean_file_name)
    }

    pub fn region_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.region_file_name)
    }

    pub fn product_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.product_file_name)
    }

    pub fn report_output_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file_name)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, name) in [
            ("clean_file_name", &self.clean_file_name),
            ("region_file_name", &self.region_file_name),
            ("product_file_name", &self.product_file_name),
            ("report_file_name", &self.report_file_name),
        ] {
            if name.trim().is_empty() || Path::new(name).file_name().is_none() {
                return Err(ConfigValidationError::InvalidFileName {
                    field: field.to_string(),
                    value: name.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid probability for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidProbability { field: String, value: f64 },

    #[error("Invalid row count: {0} (must be at least 1)")]
    InvalidRowCount(usize),

    #[error("Invalid range for '{field}': {min}..{max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    #[error("Invalid file name for '{field}': '{value}'")]
    InvalidFileName { field: String, value: String },
}

impl From<ConfigValidationError> for SalesError {
    fn from(err: ConfigValidationError) -> Self {
        SalesError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`GeneratorConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    rows: Option<usize>,
    duplicate_rows: Option<usize>,
    seed: Option<u64>,
    start_date: Option<NaiveDate>,
    date_span_days: Option<i64>,
    quantity_range: Option<(i64, i64)>,
    unit_price_range: Option<(f64, f64)>,
    discount_range: Option<(f64, f64)>,
    defect_rates: Option<DefectRates>,
    output_path: Option<PathBuf>,
}

impl GeneratorConfigBuilder {
    /// Set the number of distinct records.
    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Set the number of appended exact duplicates.
    pub fn duplicate_rows(mut self, count: usize) -> Self {
        self.duplicate_rows = Some(count);
        self
    }

    /// Fix the RNG seed for reproducible output.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn date_span_days(mut self, days: i64) -> Self {
        self.date_span_days = Some(days);
        self
    }

    pub fn quantity_range(mut self, min: i64, max: i64) -> Self {
        self.quantity_range = Some((min, max));
        self
    }

    pub fn unit_price_range(mut self, min: f64, max: f64) -> Self {
        self.unit_price_range = Some((min, max));
        self
    }

    pub fn discount_range(mut self, min: f64, max: f64) -> Self {
        self.discount_range = Some((min, max));
        self
    }

    /// Override all defect probabilities at once.
    pub fn defect_rates(mut self, rates: DefectRates) -> Self {
        self.defect_rates = Some(rates);
        self
    }

    /// Set the output CSV path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `GeneratorConfig` or an error if validation fails.
    pub fn build(self) -> Result<GeneratorConfig, ConfigValidationError> {
        let defaults = GeneratorConfig::default();
        let config = GeneratorConfig {
            rows: self.rows.unwrap_or(defaults.rows),
            duplicate_rows: self.duplicate_rows.unwrap_or(defaults.duplicate_rows),
            seed: self.seed,
            start_date: self.start_date.unwrap_or(defaults.start_date),
            date_span_days: self.date_span_days.unwrap_or(defaults.date_span_days),
            quantity_range: self.quantity_range.unwrap_or(defaults.quantity_range),
            unit_price_range: self.unit_price_range.unwrap_or(defaults.unit_price_range),
            discount_range: self.discount_range.unwrap_or(defaults.discount_range),
            defect_rates: self.defect_rates.unwrap_or(defaults.defect_rates),
            output_path: self.output_path.unwrap_or(defaults.output_path),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Builder for [`AnalyzerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalyzerConfigBuilder {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    clean_file_name: Option<String>,
    region_file_name: Option<String>,
    product_file_name: Option<String>,
    report_file_name: Option<String>,
    emit_report: Option<bool>,
    preview_rows: Option<usize>,
}

impl AnalyzerConfigBuilder {
    /// Set the raw input CSV path.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn clean_file_name(mut self, name: impl Into<String>) -> Self {
        self.clean_file_name = Some(name.into());
        self
    }

    pub fn region_file_name(mut self, name: impl Into<String>) -> Self {
        self.region_file_name = Some(name.into());
        self
    }

    pub fn product_file_name(mut self, name: impl Into<String>) -> Self {
        self.product_file_name = Some(name.into());
        self
    }

    pub fn report_file_name(mut self, name: impl Into<String>) -> Self {
        self.report_file_name = Some(name.into());
        self
    }

    /// Enable or disable the JSON run report.
    pub fn emit_report(mut self, emit: bool) -> Self {
        self.emit_report = Some(emit);
        self
    }

    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<AnalyzerConfig, ConfigValidationError> {
        let defaults = AnalyzerConfig::default();
        let config = AnalyzerConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            clean_file_name: self.clean_file_name.unwrap_or(defaults.clean_file_name),
            region_file_name: self.region_file_name.unwrap_or(defaults.region_file_name),
            product_file_name: self.product_file_name.unwrap_or(defaults.product_file_name),
            report_file_name: self.report_file_name.unwrap_or(defaults.report_file_name),
            emit_report: self.emit_report.unwrap_or(defaults.emit_report),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
        };

        config.validate()?;
        Ok(config)
    }
}
