//! Strict type conversion of raw string columns.
//!
//! Nulls stay null. A present value that does not parse is a fatal
//! [`SalesError::Parse`]; nothing is coerced to null behind the caller's back.

use crate::error::{Result, SalesError};
use crate::utils::{date_to_epoch_days, parse_date};
use polars::prelude::*;

fn parse_error(series: &Series, row: usize, value: &str, target_type: &str) -> SalesError {
    SalesError::Parse {
        column: series.name().to_string(),
        row,
        value: value.to_string(),
        target_type: target_type.to_string(),
    }
}

/// Convert a string series to `Date`.
pub(crate) fn string_to_date(series: &Series) -> Result<Series> {
    let str_series = series.str()?;
    let mut days: Vec<Option<i32>> = Vec::with_capacity(str_series.len());

    for (row, opt_val) in str_series.into_iter().enumerate() {
        match opt_val {
            Some(val) => {
                let date = parse_date(val).ok_or_else(|| parse_error(series, row, val, "date"))?;
                days.push(Some(date_to_epoch_days(date)));
            }
            None => days.push(None),
        }
    }

    Ok(Series::new(series.name().clone(), days).cast(&DataType::Date)?)
}

/// Convert a string series to `Float64`. Non-finite values are rejected.
pub(crate) fn string_to_float(series: &Series) -> Result<Series> {
    let str_series = series.str()?;
    let mut result_vec: Vec<Option<f64>> = Vec::with_capacity(str_series.len());

    for (row, opt_val) in str_series.into_iter().enumerate() {
        match opt_val {
            Some(val) => {
                let parsed = val
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| parse_error(series, row, val, "decimal"))?;
                result_vec.push(Some(parsed));
            }
            None => result_vec.push(None),
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}
