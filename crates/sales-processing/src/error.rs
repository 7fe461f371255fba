//! Custom error types for the sales cleaning pipeline.
//!
//! Row-level defects (a missing required field) are recovered by filtering
//! and only ever show up in the cleaning report. Everything else is fatal:
//! it propagates out of the pipeline and aborts the run.
//!
//! Errors serialize as `{ code, message }` so they can be embedded in the
//! JSON run report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the sales pipeline.
#[derive(Error, Debug)]
pub enum SalesError {
    /// A row lacks a required field. Recovered by dropping the row.
    #[error("Row {row} is missing required field '{column}'")]
    MissingField { column: String, row: usize },

    /// A present value could not be parsed into its column's type.
    #[error("Failed to parse '{value}' in column '{column}' (row {row}) as {target_type}")]
    Parse {
        column: String,
        row: usize,
        value: String,
        target_type: String,
    },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No rows were left to analyze.
    #[error("No rows left after cleaning")]
    EmptyDataset,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SalesError>,
    },
}

impl SalesError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SalesError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a row-level defect that filtering recovers from.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::MissingField { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl Serialize for SalesError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SalesError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for sales pipeline operations.
pub type Result<T> = std::result::Result<T, SalesError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SalesError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SalesError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(SalesError::EmptyDataset.error_code(), "EMPTY_DATASET");
        assert_eq!(
            SalesError::ColumnNotFound("Region".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let error = SalesError::Parse {
            column: "Date".to_string(),
            row: 3,
            value: "not-a-date".to_string(),
            target_type: "date".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not-a-date"));
        assert!(message.contains("Date"));
        assert_eq!(error.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_is_recoverable() {
        let missing = SalesError::MissingField {
            column: "Order_ID".to_string(),
            row: 0,
        };
        assert!(missing.is_recoverable());
        assert!(missing.with_context("filtering").is_recoverable());
        assert!(!SalesError::EmptyDataset.is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = SalesError::ColumnNotFound("Quantity".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Quantity"));
    }

    #[test]
    fn test_with_context() {
        let error = SalesError::ColumnNotFound("Date".to_string()).with_context("While parsing");
        assert!(error.to_string().contains("While parsing"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
