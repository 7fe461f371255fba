//! Human-readable console output.
//!
//! Rendering builds a `String` so the text can be checked in tests; the
//! `print_*` wrappers write it to stdout. This is user-facing output, not
//! logging, so it is shown regardless of the log level.

use crate::analysis::{GroupTotal, SalesAnalysis};
use crate::cleaner::{CleaningReport, NormalizedValues};
use crate::generator::GenerationSummary;
use crate::pipeline::PipelineOutcome;
use crate::profiler::{FrameProfile, NumericSummary};
use crate::schema::{DISCOUNT, QUANTITY, TOTAL_SALES, UNIT_PRICE};
use crate::utils::format_currency;

const WIDTH: usize = 60;

fn banner(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push("=".repeat(WIDTH));
    lines.push(title.to_string());
    lines.push("=".repeat(WIDTH));
}

fn heading(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("-".repeat(40));
}

fn missing_table(lines: &mut Vec<String>, profile: &FrameProfile) {
    for entry in &profile.missing {
        lines.push(format!("  {:<16} {:>6}", entry.column, entry.missing));
    }
}

fn summary_table(lines: &mut Vec<String>, summaries: &[NumericSummary]) {
    lines.push(format!(
        "  {:<12} {:>6} {:>10} {:>10} {:>10} {:>10}",
        "Column", "count", "mean", "std", "min", "max"
    ));
    for s in summaries {
        lines.push(format!(
            "  {:<12} {:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            s.column, s.count, s.mean, s.std, s.min, s.max
        ));
    }
}

fn normalized_values(lines: &mut Vec<String>, column: &str, values: &NormalizedValues) {
    lines.push(format!("  {} before: {:?}", column, values.before));
    lines.push(format!("  {} after:  {:?}", column, values.after));
}

fn totals_table<K: std::fmt::Display>(lines: &mut Vec<String>, totals: &[GroupTotal<K>]) {
    for entry in totals {
        lines.push(format!("  {:<16} {:>14}", entry.key.to_string(), format_currency(entry.total)));
    }
}

fn render_loading(lines: &mut Vec<String>, outcome: &PipelineOutcome) {
    banner(lines, "LOADING DATA");
    lines.push(format!("Source: {}", outcome.input_path.display()));
    lines.push(format!(
        "Dataset shape: ({}, {})",
        outcome.raw_profile.rows, outcome.raw_profile.columns
    ));

    heading(lines, "First rows");
    lines.push(outcome.raw_preview.to_string());

    heading(lines, "Missing values");
    missing_table(lines, &outcome.raw_profile);

    heading(lines, "Numeric summary");
    summary_table(lines, &outcome.raw_summaries);
}

fn render_cleaning(lines: &mut Vec<String>, cleaning: &CleaningReport, clean_profile: &FrameProfile) {
    banner(lines, "DATA CLEANING");
    lines.push(format!(
        "1. Filled {} missing Discount values with 0",
        cleaning.discounts_filled
    ));
    lines.push(format!(
        "2. Removed {} rows with missing critical fields",
        cleaning.missing_rows_dropped
    ));
    for (column, missing) in &cleaning.missing_required {
        lines.push(format!("     {:<12} {:>4} missing", column, missing));
    }
    lines.push(format!("3. Removed {} duplicate rows", cleaning.duplicates_removed));
    lines.push("4. Standardized Region and Sales_Rep".to_string());
    normalized_values(lines, "Region", &cleaning.region_values);
    normalized_values(lines, "Sales_Rep", &cleaning.sales_rep_values);
    lines.push("5. Converted Date, Quantity, Unit_Price and Discount to typed columns".to_string());
    lines.push(format!(
        "6. Replaced {} invalid emails",
        cleaning.invalid_emails_replaced
    ));

    heading(lines, "Missing values after cleaning");
    missing_table(lines, clean_profile);
    lines.push(format!(
        "Rows: {} -> {}",
        cleaning.rows_before, cleaning.rows_after
    ));
}

fn render_derived(lines: &mut Vec<String>, outcome: &PipelineOutcome) {
    banner(lines, "DERIVED COLUMNS");
    lines.push("Added Total_Sales, Month, Month_Name and Quarter".to_string());
    if let Ok(sample) = outcome
        .data
        .select([QUANTITY, UNIT_PRICE, DISCOUNT, TOTAL_SALES])
    {
        lines.push(sample.head(Some(5)).to_string());
    }
}

fn render_analysis(lines: &mut Vec<String>, analysis: &SalesAnalysis) {
    banner(lines, "SALES ANALYSIS");

    let overall = &analysis.overall;
    lines.push(format!("Total Revenue:       {}", format_currency(overall.total_revenue)));
    lines.push(format!(
        "Average Order Value: {}",
        format_currency(overall.average_order_value)
    ));
    lines.push(format!("Total Orders:        {}", overall.order_count));

    heading(lines, "Sales by Region");
    totals_table(lines, &analysis.by_region);

    heading(lines, "Sales by Product");
    totals_table(lines, &analysis.by_product);

    heading(lines, "Sales Rep Performance");
    lines.push(format!(
        "  {:<16} {:>12} {:>12} {:>6}",
        "Sales_Rep", "sum", "mean", "count"
    ));
    for rep in &analysis.by_sales_rep {
        lines.push(format!(
            "  {:<16} {:>12.2} {:>12.2} {:>6}",
            rep.sales_rep, rep.total, rep.mean, rep.orders
        ));
    }

    heading(lines, "Monthly Sales");
    totals_table(lines, &analysis.by_month_name);

    heading(lines, "Sales by Month Number");
    totals_table(lines, &analysis.by_month);

    heading(lines, "Quarterly Sales");
    for entry in &analysis.by_quarter {
        lines.push(format!("  Q{:<15} {:>14}", entry.key, format_currency(entry.total)));
    }

    heading(lines, "Key Insights");
    if let Some(top) = analysis.top_region() {
        lines.push(format!("  Top Region:  {} ({})", top.key, format_currency(top.total)));
    }
    if let Some(top) = analysis.top_product() {
        lines.push(format!("  Top Product: {} ({})", top.key, format_currency(top.total)));
    }
    if let Some(best) = analysis.best_month() {
        lines.push(format!("  Best Month:  {} ({})", best.key, format_currency(best.total)));
    }
}

fn render_exports(lines: &mut Vec<String>, outcome: &PipelineOutcome) {
    banner(lines, "EXPORTING RESULTS");
    let outputs = &outcome.outputs;
    lines.push(format!("Saved: {}", outputs.clean_data.display()));
    lines.push(format!("Saved: {}", outputs.by_region.display()));
    lines.push(format!("Saved: {}", outputs.by_product.display()));
    if let Some(report) = &outputs.report {
        lines.push(format!("Saved: {}", report.display()));
    }
}

/// Render the full analyzer report.
pub fn render_analysis_report(outcome: &PipelineOutcome) -> String {
    let mut lines = Vec::new();

    render_loading(&mut lines, outcome);
    render_cleaning(&mut lines, &outcome.cleaning, &outcome.clean_profile);
    render_derived(&mut lines, outcome);
    render_analysis(&mut lines, &outcome.analysis);
    render_exports(&mut lines, outcome);

    banner(&mut lines, "ANALYSIS COMPLETE");
    lines.push(format!("Original rows:   {}", outcome.cleaning.rows_before));
    lines.push(format!("Final rows:      {}", outcome.data.height()));
    lines.push(format!("Columns:         {}", outcome.data.width()));
    lines.push(format!(
        "Total revenue:   {}",
        format_currency(outcome.analysis.overall.total_revenue)
    ));
    lines.push(format!("Duration:        {}ms", outcome.duration_ms));
    lines.push("=".repeat(WIDTH));

    lines.join("\n")
}

pub fn print_analysis_report(outcome: &PipelineOutcome) {
    println!("{}", render_analysis_report(outcome));
}

/// Render what the generator wrote and which defects it injected.
pub fn render_generation_summary(summary: &GenerationSummary) -> String {
    let defects = &summary.defects;
    let lines = [
        format!(
            "Messy sales data generated: {} ({} rows)",
            summary.path.display(),
            summary.rows_written
        ),
        String::new(),
        "Data quality issues included:".to_string(),
        format!(
            "  - Missing values (Order_ID: {}, Date: {}, Quantity: {}, Unit_Price: {}, Discount: {})",
            defects.missing_order_id,
            defects.missing_date,
            defects.missing_quantity,
            defects.missing_unit_price,
            defects.missing_discount
        ),
        format!("  - Duplicate rows: {}", defects.duplicate_rows),
        "  - Inconsistent capitalization in Region and Sales_Rep".to_string(),
        format!("  - Invalid emails: {}", defects.invalid_email),
        "  - Rows in random order".to_string(),
    ];
    lines.join("\n")
}

pub fn print_generation_summary(summary: &GenerationSummary) {
    println!("{}", render_generation_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::generator::DefectCounts;
    use crate::pipeline::SalesPipeline;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_generation_summary_lists_defects() {
        let summary = GenerationSummary {
            path: PathBuf::from("data/messy_sales_data.csv"),
            rows_written: 210,
            defects: DefectCounts {
                missing_order_id: 9,
                invalid_email: 21,
                duplicate_rows: 10,
                ..DefectCounts::default()
            },
        };
        let text = render_generation_summary(&summary);

        assert!(text.contains("data/messy_sales_data.csv (210 rows)"));
        assert!(text.contains("Order_ID: 9"));
        assert!(text.contains("Duplicate rows: 10"));
        assert!(text.contains("Invalid emails: 21"));
    }

    #[test]
    fn test_analysis_report_sections() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("raw.csv");
        fs::write(
            &input,
            "Order_ID,Date,Product,Quantity,Unit_Price,Region,Sales_Rep,Customer_Email,Discount\n\
             ORD001,2024-03-10,Monitor,4,250.00,west,alice williams,customer0@email.com,\n",
        )
        .unwrap();
        let config = AnalyzerConfig::builder()
            .input_path(input)
            .output_dir(dir.path().join("out"))
            .build()
            .unwrap();
        let outcome = SalesPipeline::builder().config(config).build().unwrap().run().unwrap();

        let text = render_analysis_report(&outcome);
        for section in [
            "LOADING DATA",
            "DATA CLEANING",
            "DERIVED COLUMNS",
            "SALES ANALYSIS",
            "EXPORTING RESULTS",
            "ANALYSIS COMPLETE",
        ] {
            assert!(text.contains(section), "missing section {section}");
        }
        assert!(text.contains("Total Revenue:       $1,000.00"));
        assert!(text.contains("Top Region:  West ($1,000.00)"));
        assert!(text.contains("Best Month:  March"));
        assert!(text.contains("Q1"));
    }
}
