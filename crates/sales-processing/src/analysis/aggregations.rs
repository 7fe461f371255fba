//! Group-by helpers over Total_Sales.
//!
//! Rows whose key is null belong to no group and are left out of every
//! grouping. Blank strings are ordinary keys.

use crate::error::Result;
use crate::schema::TOTAL_SALES;
use polars::prelude::*;

pub(crate) const SUM_ALIAS: &str = "Total_Sales_sum";
pub(crate) const MEAN_ALIAS: &str = "Total_Sales_mean";
pub(crate) const COUNT_ALIAS: &str = "Order_Count";

/// Sum of Total_Sales per distinct `key`, unordered.
pub(crate) fn sum_by(df: &DataFrame, key: &str) -> Result<DataFrame> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([col(TOTAL_SALES).sum().alias(SUM_ALIAS)])
        .collect()?;
    Ok(grouped)
}

/// Sum, mean and count of Total_Sales per distinct `key`, unordered.
pub(crate) fn sum_mean_count_by(df: &DataFrame, key: &str) -> Result<DataFrame> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([
            col(TOTAL_SALES).sum().alias(SUM_ALIAS),
            col(TOTAL_SALES).mean().alias(MEAN_ALIAS),
            col(TOTAL_SALES).count().alias(COUNT_ALIAS),
        ])
        .collect()?;
    Ok(grouped)
}

/// Extract `(key, value)` pairs where the key column is a string.
pub(crate) fn string_keyed(grouped: &DataFrame, key: &str, value: &str) -> Result<Vec<(String, f64)>> {
    let keys = grouped.column(key)?.cast(&DataType::String)?;
    let values = grouped.column(value)?.cast(&DataType::Float64)?;

    let pairs = keys
        .str()?
        .into_iter()
        .zip(values.f64()?)
        .filter_map(|(k, v)| k.map(|k| (k.to_string(), v.unwrap_or(0.0))))
        .collect();
    Ok(pairs)
}

/// Extract `(key, value)` pairs where the key column is an integer.
pub(crate) fn integer_keyed(grouped: &DataFrame, key: &str, value: &str) -> Result<Vec<(i32, f64)>> {
    let keys = grouped.column(key)?.cast(&DataType::Int32)?;
    let values = grouped.column(value)?.cast(&DataType::Float64)?;

    let pairs = keys
        .i32()?
        .into_iter()
        .zip(values.f64()?)
        .filter_map(|(k, v)| k.map(|k| (k, v.unwrap_or(0.0))))
        .collect();
    Ok(pairs)
}

/// Extract an unsigned count column aligned with the group rows.
pub(crate) fn counts(grouped: &DataFrame, value: &str) -> Result<Vec<u64>> {
    let values = grouped.column(value)?.cast(&DataType::UInt64)?;
    Ok(values.u64()?.into_iter().map(|v| v.unwrap_or(0)).collect())
}
