//! Derived columns computed from a cleaned sales DataFrame.
//!
//! Output layout after [`derive_all`]: the nine input columns followed by
//! Total_Sales, Month, Month_Name and Quarter.

use crate::error::{Result, SalesError};
use crate::schema::{DATE, DISCOUNT, MONTH, MONTH_NAME, QUANTITY, QUARTER, TOTAL_SALES, UNIT_PRICE};
use crate::utils::{epoch_days_to_date, month_name, quarter_of};
use chrono::Datelike;
use polars::prelude::*;
use tracing::debug;

/// Add every derived column.
pub fn derive_all(df: DataFrame) -> Result<DataFrame> {
    let df = add_total_sales(df)?;
    add_time_components(df)
}

/// Total_Sales = Quantity × Unit_Price × (1 − Discount).
pub fn add_total_sales(mut df: DataFrame) -> Result<DataFrame> {
    let quantity = df.column(QUANTITY)?.cast(&DataType::Float64)?;
    let price = df.column(UNIT_PRICE)?.cast(&DataType::Float64)?;
    let discount = df.column(DISCOUNT)?.cast(&DataType::Float64)?;

    let quantity = quantity.f64()?;
    let price = price.f64()?;
    let discount = discount.f64()?;

    let totals: Vec<Option<f64>> = quantity
        .into_iter()
        .zip(price)
        .zip(discount)
        .map(|((q, p), d)| match (q, p) {
            (Some(q), Some(p)) => Some(q * p * (1.0 - d.unwrap_or(0.0))),
            _ => None,
        })
        .collect();

    df.with_column(Series::new(TOTAL_SALES.into(), totals))?;
    debug!("Derived {}", TOTAL_SALES);
    Ok(df)
}

/// Month (1-12), Month_Name and Quarter (1-4) from the parsed Date.
pub fn add_time_components(mut df: DataFrame) -> Result<DataFrame> {
    let date_column = df.column(DATE)?;
    if date_column.dtype() != &DataType::Date {
        return Err(SalesError::Parse {
            column: DATE.to_string(),
            row: 0,
            value: date_column.dtype().to_string(),
            target_type: "date".to_string(),
        });
    }

    let physical = date_column.cast(&DataType::Int32)?;
    let days = physical.i32()?;

    let mut months: Vec<Option<i32>> = Vec::with_capacity(days.len());
    let mut names: Vec<Option<&'static str>> = Vec::with_capacity(days.len());
    let mut quarters: Vec<Option<i32>> = Vec::with_capacity(days.len());

    for opt_days in days.into_iter() {
        match opt_days.and_then(epoch_days_to_date) {
            Some(date) => {
                let month = date.month();
                months.push(Some(month as i32));
                names.push(Some(month_name(month)));
                quarters.push(Some(quarter_of(month) as i32));
            }
            None => {
                months.push(None);
                names.push(None);
                quarters.push(None);
            }
        }
    }

    df.with_column(Series::new(MONTH.into(), months))?;
    df.with_column(Series::new(MONTH_NAME.into(), names))?;
    df.with_column(Series::new(QUARTER.into(), quarters))?;
    debug!("Derived {}, {}, {}", MONTH, MONTH_NAME, QUARTER);
    Ok(df)
}
