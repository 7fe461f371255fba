//! Sales aggregations over a cleaned and derived DataFrame.
//!
//! Every aggregation partitions the full row set, so the totals of any one
//! grouping sum to the overall revenue.

mod aggregations;

use crate::error::{Result, SalesError};
use crate::schema::{MONTH, MONTH_NAME, PRODUCT, QUARTER, REGION, SALES_REP, TOTAL_SALES};
use crate::utils::round2;
use aggregations::{
    COUNT_ALIAS, MEAN_ALIAS, SUM_ALIAS, counts, integer_keyed, string_keyed, sum_by,
    sum_mean_count_by,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Summed Total_Sales for one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal<K> {
    pub key: K,
    pub total: f64,
}

impl<K> GroupTotal<K> {
    fn from_pairs(pairs: Vec<(K, f64)>) -> Vec<Self> {
        pairs
            .into_iter()
            .map(|(key, total)| Self { key, total })
            .collect()
    }
}

impl GroupTotal<String> {
    /// Two-column `(key_name, Total_Sales)` frame, in slice order.
    pub fn to_dataframe(key_name: &str, totals: &[Self]) -> Result<DataFrame> {
        let keys: Vec<&str> = totals.iter().map(|t| t.key.as_str()).collect();
        let values: Vec<f64> = totals.iter().map(|t| t.total).collect();
        Ok(DataFrame::new(vec![
            Column::new(key_name.into(), keys),
            Column::new(TOTAL_SALES.into(), values),
        ])?)
    }
}

/// Per-rep sum, mean and count of Total_Sales, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepPerformance {
    pub sales_rep: String,
    pub total: f64,
    pub mean: f64,
    pub orders: u64,
}

/// Whole-dataset revenue figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub order_count: usize,
}

/// Every aggregation the analyzer reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesAnalysis {
    pub overall: OverallMetrics,
    /// Descending by total.
    pub by_region: Vec<GroupTotal<String>>,
    /// Descending by total.
    pub by_product: Vec<GroupTotal<String>>,
    /// Ascending by rep name.
    pub by_sales_rep: Vec<RepPerformance>,
    /// Descending by total.
    pub by_month_name: Vec<GroupTotal<String>>,
    /// Chronological.
    pub by_month: Vec<GroupTotal<i32>>,
    /// Ascending by quarter.
    pub by_quarter: Vec<GroupTotal<i32>>,
}

impl SalesAnalysis {
    pub fn top_region(&self) -> Option<&GroupTotal<String>> {
        self.by_region.first()
    }

    pub fn top_product(&self) -> Option<&GroupTotal<String>> {
        self.by_product.first()
    }

    pub fn best_month(&self) -> Option<&GroupTotal<String>> {
        self.by_month_name.first()
    }

    /// Region aggregation as an exportable frame.
    pub fn region_frame(&self) -> Result<DataFrame> {
        GroupTotal::<String>::to_dataframe(REGION, &self.by_region)
    }

    /// Product aggregation as an exportable frame.
    pub fn product_frame(&self) -> Result<DataFrame> {
        GroupTotal::<String>::to_dataframe(PRODUCT, &self.by_product)
    }
}

/// Descending by total; equal totals fall back to ascending key.
fn sort_descending<K: Ord>(totals: &mut [GroupTotal<K>]) {
    totals.sort_by(|a, b| match b.total.total_cmp(&a.total) {
        Ordering::Equal => a.key.cmp(&b.key),
        other => other,
    });
}

/// Computes [`SalesAnalysis`] from a derived DataFrame.
#[derive(Debug, Default)]
pub struct SalesAnalyzer;

impl SalesAnalyzer {
    /// Run every aggregation.
    ///
    /// Fails with [`SalesError::EmptyDataset`] when no rows are left, since
    /// there is no top region, product or month to report.
    pub fn analyze(&self, df: &DataFrame) -> Result<SalesAnalysis> {
        if df.height() == 0 {
            return Err(SalesError::EmptyDataset);
        }

        info!("Analyzing {} cleaned rows...", df.height());

        let analysis = SalesAnalysis {
            overall: Self::overall_metrics(df)?,
            by_region: Self::totals_descending(df, REGION)?,
            by_product: Self::totals_descending(df, PRODUCT)?,
            by_sales_rep: Self::rep_performance(df)?,
            by_month_name: Self::totals_descending(df, MONTH_NAME)?,
            by_month: Self::totals_ascending(df, MONTH)?,
            by_quarter: Self::totals_ascending(df, QUARTER)?,
        };

        debug!(
            "Aggregated {} regions, {} products, {} reps",
            analysis.by_region.len(),
            analysis.by_product.len(),
            analysis.by_sales_rep.len()
        );
        Ok(analysis)
    }

    /// Total revenue, average order value and order count.
    pub fn overall_metrics(df: &DataFrame) -> Result<OverallMetrics> {
        let totals = df.column(TOTAL_SALES)?.cast(&DataType::Float64)?;
        let totals = totals.f64()?;

        Ok(OverallMetrics {
            total_revenue: totals.sum().unwrap_or(0.0),
            average_order_value: totals.mean().unwrap_or(0.0),
            order_count: df.height(),
        })
    }

    /// Sum of Total_Sales per string key, largest first.
    pub fn totals_descending(df: &DataFrame, key: &str) -> Result<Vec<GroupTotal<String>>> {
        let grouped = sum_by(df, key)?;
        let mut totals = GroupTotal::from_pairs(string_keyed(&grouped, key, SUM_ALIAS)?);
        sort_descending(&mut totals);
        Ok(totals)
    }

    /// Sum of Total_Sales per integer key, smallest key first.
    pub fn totals_ascending(df: &DataFrame, key: &str) -> Result<Vec<GroupTotal<i32>>> {
        let grouped = sum_by(df, key)?;
        let mut totals = GroupTotal::from_pairs(integer_keyed(&grouped, key, SUM_ALIAS)?);
        totals.sort_by_key(|t| t.key);
        Ok(totals)
    }

    /// Sum, mean and count per Sales_Rep, ordered by rep name.
    pub fn rep_performance(df: &DataFrame) -> Result<Vec<RepPerformance>> {
        let grouped = sum_mean_count_by(df, SALES_REP)?;
        let sums = string_keyed(&grouped, SALES_REP, SUM_ALIAS)?;
        let means = string_keyed(&grouped, SALES_REP, MEAN_ALIAS)?;
        let order_counts = counts(&grouped, COUNT_ALIAS)?;

        let mut reps: Vec<RepPerformance> = sums
            .into_iter()
            .zip(means)
            .zip(order_counts)
            .map(|(((sales_rep, total), (_, mean)), orders)| RepPerformance {
                sales_rep,
                total: round2(total),
                mean: round2(mean),
                orders,
            })
            .collect();
        reps.sort_by(|a, b| a.sales_rep.cmp(&b.sales_rep));
        Ok(reps)
    }
}
