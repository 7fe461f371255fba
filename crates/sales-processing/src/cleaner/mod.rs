//! Fixed cleaning pipeline for raw sales data.
//!
//! The steps run in this order, each assuming the previous ones completed:
//! 1. Fill missing Discount with 0
//! 2. Drop rows missing Order_ID, Date, Quantity or Unit_Price
//! 3. Remove exact duplicate rows
//! 4. Trim and title-case Region and Sales_Rep
//! 5. Parse Date, Quantity, Unit_Price and Discount into typed columns
//! 6. Replace the `INVALID` email sentinel with a placeholder address
//!
//! Only step 2 recovers from bad rows. A malformed value reaching step 5
//! aborts the whole run.

mod converters;
mod normalizers;

use crate::error::{Result, SalesError};
use crate::schema::{
    CUSTOMER_EMAIL, DATE, DISCOUNT, INPUT_COLUMNS, INVALID_EMAIL_SENTINEL, NORMALIZED_COLUMNS,
    PLACEHOLDER_EMAIL, QUANTITY, REGION, REQUIRED_COLUMNS, SALES_REP, UNIT_PRICE,
};
use normalizers::{distinct_values, fill_blank, is_blank, normalize_labels, replace_exact};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Distinct values of a normalized column before and after step 4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedValues {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// What the cleaning pipeline did, step by step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub discounts_filled: usize,
    /// Missing-value count per required column, before filtering.
    pub missing_required: BTreeMap<String, usize>,
    pub missing_rows_dropped: usize,
    pub duplicates_removed: usize,
    pub region_values: NormalizedValues,
    pub sales_rep_values: NormalizedValues,
    pub invalid_emails_replaced: usize,
    pub rows_after: usize,
    /// Human-readable log of every step.
    pub actions: Vec<String>,
}

/// Runs the fixed cleaning pipeline.
#[derive(Debug, Default)]
pub struct SalesCleaner;

impl SalesCleaner {
    /// Clean a raw 9-column sales DataFrame.
    ///
    /// Input columns may be strings or already typed; they are normalized to
    /// strings first so that every value goes through the same parser.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleaningReport)> {
        info!("Cleaning {} raw rows...", df.height());

        let mut report = CleaningReport {
            rows_before: df.height(),
            ..CleaningReport::default()
        };

        let df = Self::select_input_columns(&df)?;
        let df = Self::fill_missing_discount(df, &mut report)?;
        let df = Self::drop_incomplete_rows(df, &mut report)?;
        let df = Self::remove_duplicates(df, &mut report)?;
        let df = Self::normalize_text(df, &mut report)?;
        let df = Self::parse_types(df, &mut report)?;
        let df = Self::repair_emails(df, &mut report)?;

        report.rows_after = df.height();
        info!(
            "Cleaning complete: {} -> {} rows",
            report.rows_before, report.rows_after
        );

        Ok((df, report))
    }

    /// Keep the nine input columns, in schema order, as strings.
    ///
    /// A missing column is fatal.
    pub fn select_input_columns(df: &DataFrame) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(INPUT_COLUMNS.len());
        for name in INPUT_COLUMNS {
            let column = df
                .column(name)
                .map_err(|_| SalesError::ColumnNotFound(name.to_string()))?;
            let column = if column.dtype() == &DataType::String {
                column.clone()
            } else {
                column.cast(&DataType::String)?
            };
            columns.push(column);
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Step 1: blank Discount becomes "0".
    pub fn fill_missing_discount(
        mut df: DataFrame,
        report: &mut CleaningReport,
    ) -> Result<DataFrame> {
        let (filled, count) = fill_blank(df.column(DISCOUNT)?.as_materialized_series(), "0")?;
        df.replace(DISCOUNT, filled)?;

        report.discounts_filled = count;
        report
            .actions
            .push(format!("Filled {} missing Discount values with 0", count));
        debug!("Filled {} missing discounts", count);
        Ok(df)
    }

    /// Step 2: drop rows with a blank required field.
    pub fn drop_incomplete_rows(df: DataFrame, report: &mut CleaningReport) -> Result<DataFrame> {
        let mut keep = vec![true; df.height()];

        for name in REQUIRED_COLUMNS {
            let values = df.column(name)?.str()?;
            let mut missing = 0;
            for (row, opt_val) in values.into_iter().enumerate() {
                if is_blank(opt_val) {
                    missing += 1;
                    if keep[row] {
                        let defect = SalesError::MissingField {
                            column: name.to_string(),
                            row,
                        };
                        debug!("Dropping row: {}", defect);
                    }
                    keep[row] = false;
                }
            }
            report.missing_required.insert(name.to_string(), missing);
        }

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let before = df.height();
        let df = df.filter(&mask)?;
        let dropped = before - df.height();

        report.missing_rows_dropped = dropped;
        report.actions.push(format!(
            "Dropped {} rows with missing Order_ID, Date, Quantity, or Unit_Price",
            dropped
        ));
        info!("Dropped {} incomplete rows", dropped);
        Ok(df)
    }

    /// Step 3: remove exact duplicate rows, keeping the first occurrence.
    pub fn remove_duplicates(df: DataFrame, report: &mut CleaningReport) -> Result<DataFrame> {
        let before = df.height();
        let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        let removed = before - df.height();

        report.duplicates_removed = removed;
        report
            .actions
            .push(format!("Removed {} duplicate rows", removed));
        info!("Removed {} duplicate rows", removed);
        Ok(df)
    }

    /// Step 4: trim and title-case Region and Sales_Rep.
    pub fn normalize_text(mut df: DataFrame, report: &mut CleaningReport) -> Result<DataFrame> {
        for name in NORMALIZED_COLUMNS {
            let series = df.column(name)?.as_materialized_series().clone();
            let normalized = normalize_labels(&series)?;

            let values = NormalizedValues {
                before: distinct_values(&series)?,
                after: distinct_values(&normalized)?,
            };
            debug!("{}: {:?} -> {:?}", name, values.before, values.after);
            report.actions.push(format!(
                "Standardized {}: {} distinct values -> {}",
                name,
                values.before.len(),
                values.after.len()
            ));

            match name {
                REGION => report.region_values = values,
                SALES_REP => report.sales_rep_values = values,
                _ => {}
            }

            df.replace(name, normalized)?;
        }

        Ok(df)
    }

    /// Step 5: parse Date, Quantity, Unit_Price and Discount.
    pub fn parse_types(mut df: DataFrame, report: &mut CleaningReport) -> Result<DataFrame> {
        let dates = converters::string_to_date(df.column(DATE)?.as_materialized_series())?;
        df.replace(DATE, dates)?;

        for name in [QUANTITY, UNIT_PRICE, DISCOUNT] {
            let parsed = converters::string_to_float(df.column(name)?.as_materialized_series())?;
            df.replace(name, parsed)?;
        }

        report
            .actions
            .push("Converted Date to date, Quantity/Unit_Price/Discount to numbers".to_string());
        debug!("Parsed typed columns");
        Ok(df)
    }

    /// Step 6: replace the `INVALID` email sentinel.
    pub fn repair_emails(mut df: DataFrame, report: &mut CleaningReport) -> Result<DataFrame> {
        let (repaired, count) = replace_exact(
            df.column(CUSTOMER_EMAIL)?.as_materialized_series(),
            INVALID_EMAIL_SENTINEL,
            PLACEHOLDER_EMAIL,
        )?;
        df.replace(CUSTOMER_EMAIL, repaired)?;

        report.invalid_emails_replaced = count;
        report.actions.push(format!(
            "Replaced {} invalid emails with '{}'",
            count, PLACEHOLDER_EMAIL
        ));
        info!("Replaced {} invalid emails", count);
        Ok(df)
    }
}
