//! Integration tests for the sales generator and analysis pipeline.
//!
//! These tests run the full flow against fixture files and generated data,
//! writing outputs into temporary directories.

use polars::prelude::*;
use pretty_assertions::assert_eq;
use sales_processing::schema::{
    CUSTOMER_EMAIL, DERIVED_COLUMNS, DISCOUNT, INPUT_COLUMNS, ORDER_ID, PLACEHOLDER_EMAIL,
    PRODUCT, QUANTITY, REGION, SALES_REP, TOTAL_SALES, UNIT_PRICE,
};
use sales_processing::utils::normalize_label;
use sales_processing::{
    AnalyzerConfig, DataGenerator, GeneratorConfig, PipelineOutcome, SalesError, SalesPipeline,
    read_raw_csv,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn run_pipeline(input: &Path, output_dir: &Path) -> Result<PipelineOutcome, SalesError> {
    let config = AnalyzerConfig::builder()
        .input_path(input)
        .output_dir(output_dir)
        .build()
        .unwrap();
    SalesPipeline::builder().config(config).build()?.run()
}

fn run_fixture(name: &str) -> (TempDir, Result<PipelineOutcome, SalesError>) {
    let dir = TempDir::new().unwrap();
    let result = run_pipeline(&fixtures_path().join(name), &dir.path().join("output"));
    (dir, result)
}

fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

fn floats(df: &DataFrame, column: &str) -> Vec<f64> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Fixture Pipeline Tests
// ============================================================================

#[test]
fn test_messy_fixture_cleaning_counts() {
    let (_dir, result) = run_fixture("messy_sales.csv");
    let outcome = result.unwrap();
    let cleaning = &outcome.cleaning;

    assert_eq!(cleaning.rows_before, 9);
    assert_eq!(cleaning.discounts_filled, 2);
    assert_eq!(cleaning.missing_rows_dropped, 4);
    assert_eq!(cleaning.duplicates_removed, 1);
    assert_eq!(cleaning.invalid_emails_replaced, 1);
    assert_eq!(cleaning.rows_after, 4);
    assert_eq!(cleaning.region_values.after, vec!["North", "South", "East"]);
    assert_eq!(
        cleaning.sales_rep_values.after,
        vec!["John Doe", "Jane Smith", "Alice Williams"]
    );
}

#[test]
fn test_messy_fixture_clean_rows() {
    let (_dir, result) = run_fixture("messy_sales.csv");
    let data = result.unwrap().data;

    assert_eq!(
        strings(&data, ORDER_ID),
        vec!["ORD001", "ORD002", "ORD006", "ORD008"]
    );
    assert_eq!(strings(&data, REGION), vec!["North", "South", "North", "East"]);
    assert_eq!(
        strings(&data, CUSTOMER_EMAIL)[1],
        PLACEHOLDER_EMAIL.to_string()
    );

    // {Quantity: 10, Unit_Price: 20.00, Discount: ""} -> 200.00
    assert_eq!(floats(&data, DISCOUNT)[0], 0.0);
    assert_close(floats(&data, TOTAL_SALES)[0], 200.0);
}

#[test]
fn test_messy_fixture_aggregations() {
    let (_dir, result) = run_fixture("messy_sales.csv");
    let analysis = result.unwrap().analysis;

    assert_close(analysis.overall.total_revenue, 805.9);
    assert_close(analysis.overall.average_order_value, 201.475);
    assert_eq!(analysis.overall.order_count, 4);

    let regions: Vec<&str> = analysis.by_region.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(regions, vec!["North", "East", "South"]);

    let products: Vec<&str> = analysis.by_product.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(products, vec!["Monitor", "Laptop", "Webcam", "Mouse"]);

    let reps: Vec<(&str, u64)> = analysis
        .by_sales_rep
        .iter()
        .map(|r| (r.sales_rep.as_str(), r.orders))
        .collect();
    assert_eq!(
        reps,
        vec![("Alice Williams", 1), ("Jane Smith", 1), ("John Doe", 2)]
    );
    assert_eq!(analysis.by_sales_rep[2].total, 560.0);
    assert_eq!(analysis.by_sales_rep[2].mean, 280.0);

    assert_eq!(analysis.best_month().unwrap().key, "April");
    let months: Vec<i32> = analysis.by_month.iter().map(|t| t.key).collect();
    assert_eq!(months, vec![1, 2, 4, 10]);
    let quarters: Vec<i32> = analysis.by_quarter.iter().map(|t| t.key).collect();
    assert_eq!(quarters, vec![1, 2, 4]);
}

#[test]
fn test_exported_files() {
    let (dir, result) = run_fixture("messy_sales.csv");
    result.unwrap();
    let output = dir.path().join("output");

    let clean = read_raw_csv(&output.join("clean_sales_data.csv")).unwrap();
    let expected: Vec<String> = INPUT_COLUMNS
        .iter()
        .chain(DERIVED_COLUMNS.iter())
        .map(|s| s.to_string())
        .collect();
    assert_eq!(column_names(&clean), expected);
    assert_eq!(clean.height(), 4);
    assert_eq!(strings(&clean, "Date")[0], "2024-01-15");

    let by_region = read_raw_csv(&output.join("sales_by_region.csv")).unwrap();
    assert_eq!(column_names(&by_region), vec!["Region", "Total_Sales"]);
    assert_eq!(strings(&by_region, REGION), vec!["North", "East", "South"]);

    let by_product = read_raw_csv(&output.join("sales_by_product.csv")).unwrap();
    assert_eq!(column_names(&by_product), vec!["Product", "Total_Sales"]);
    assert_eq!(by_product.height(), 4);

    assert!(!output.join("sales_report.json").exists());
}

#[test]
fn test_rerun_overwrites_outputs() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output");
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("sales_by_region.csv"), "stale\n1\n2\n3\n4\n5\n6\n").unwrap();

    run_pipeline(&fixtures_path().join("messy_sales.csv"), &output).unwrap();

    let by_region = read_raw_csv(&output.join("sales_by_region.csv")).unwrap();
    assert_eq!(by_region.height(), 3);
}

#[test]
fn test_bad_date_is_fatal() {
    let (dir, result) = run_fixture("bad_date.csv");

    match result {
        Err(SalesError::Parse { column, row, value, .. }) => {
            assert_eq!(column, "Date");
            assert_eq!(row, 1);
            assert_eq!(value, "not-a-date");
        }
        other => panic!("expected parse error, got {:?}", other.map(|o| o.data.shape())),
    }
    assert!(!dir.path().join("output").join("clean_sales_data.csv").exists());
}

#[test]
fn test_missing_column_is_fatal() {
    let (_dir, result) = run_fixture("missing_discount_column.csv");
    let err = result.unwrap_err();

    assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    assert!(err.to_string().contains("Discount"));
}

#[test]
fn test_no_complete_rows_is_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("raw.csv");
    fs::write(
        &input,
        "Order_ID,Date,Product,Quantity,Unit_Price,Region,Sales_Rep,Customer_Email,Discount\n\
         ,2024-01-01,Laptop,1,10.00,North,John Doe,customer0@email.com,0.1\n",
    )
    .unwrap();

    let err = run_pipeline(&input, &dir.path().join("output")).unwrap_err();
    assert!(matches!(err, SalesError::EmptyDataset));
}

#[test]
fn test_na_tokens_count_as_missing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("raw.csv");
    fs::write(
        &input,
        "Order_ID,Date,Product,Quantity,Unit_Price,Region,Sales_Rep,Customer_Email,Discount\n\
         ORD001,2024-01-15,Laptop,2,100.00,North,John Doe,customer0@email.com,NaN\n\
         NA,2024-02-01,Mouse,1,20.00,South,Jane Smith,customer1@email.com,0.1\n\
         ORD003,2024-03-01,Webcam,N/A,50.00,East,Bob Johnson,customer2@email.com,0.2\n",
    )
    .unwrap();

    let outcome = run_pipeline(&input, &dir.path().join("output")).unwrap();
    assert_eq!(outcome.cleaning.discounts_filled, 1);
    assert_eq!(outcome.cleaning.missing_rows_dropped, 2);
    assert_eq!(strings(&outcome.data, ORDER_ID), vec!["ORD001"]);
    assert_close(outcome.analysis.overall.total_revenue, 200.0);
}

#[test]
fn test_fractional_quantity_flows_into_total_sales() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("raw.csv");
    fs::write(
        &input,
        "Order_ID,Date,Product,Quantity,Unit_Price,Region,Sales_Rep,Customer_Email,Discount\n\
         ORD001,2024-01-15,Laptop,2.5,20.00,North,John Doe,customer0@email.com,0\n",
    )
    .unwrap();

    let outcome = run_pipeline(&input, &dir.path().join("output")).unwrap();
    assert_close(floats(&outcome.data, TOTAL_SALES)[0], 50.0);
}

// ============================================================================
// Generator -> Analyzer Tests
// ============================================================================

fn generate(dir: &Path, seed: u64) -> PathBuf {
    let path = dir.join("data").join("messy_sales_data.csv");
    let config = GeneratorConfig::builder()
        .seed(seed)
        .output_path(&path)
        .build()
        .unwrap();
    let summary = DataGenerator::new(config).write_csv().unwrap();
    assert_eq!(summary.rows_written, 210);
    path
}

#[test]
fn test_generator_is_reproducible_with_seed() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let a = fs::read(generate(first.path(), 42)).unwrap();
    let b = fs::read(generate(second.path(), 42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_generated_data_cleans_to_invariants() {
    let dir = TempDir::new().unwrap();
    let input = generate(dir.path(), 2024);
    let outcome = run_pipeline(&input, &dir.path().join("output")).unwrap();
    let data = &outcome.data;

    assert_eq!(outcome.raw_profile.rows, 210);
    assert!(outcome.cleaning.duplicates_removed <= 10);
    assert_eq!(data.width(), 13);

    for name in [ORDER_ID, "Date", QUANTITY, UNIT_PRICE, DISCOUNT] {
        assert_eq!(data.column(name).unwrap().null_count(), 0, "{name} has nulls");
    }

    for name in [REGION, SALES_REP] {
        for value in strings(data, name) {
            assert_eq!(normalize_label(&value), value);
        }
    }

    assert!(!strings(data, CUSTOMER_EMAIL).iter().any(|e| e == "INVALID"));

    let unique = data.unique_stable(None, UniqueKeepStrategy::First, None).unwrap();
    assert_eq!(unique.height(), data.height());

    let quantity = floats(data, QUANTITY);
    let price = floats(data, UNIT_PRICE);
    let discount = floats(data, DISCOUNT);
    let total = floats(data, TOTAL_SALES);
    for i in 0..data.height() {
        assert_close(total[i], quantity[i] * price[i] * (1.0 - discount[i]));
    }
}

#[test]
fn test_generated_data_partition_completeness() {
    let dir = TempDir::new().unwrap();
    let input = generate(dir.path(), 99);
    let outcome = run_pipeline(&input, &dir.path().join("output")).unwrap();

    let revenue: f64 = floats(&outcome.data, TOTAL_SALES).iter().sum();
    let analysis = &outcome.analysis;

    let region_sum: f64 = analysis.by_region.iter().map(|t| t.total).sum();
    let product_sum: f64 = analysis.by_product.iter().map(|t| t.total).sum();
    let quarter_sum: f64 = analysis.by_quarter.iter().map(|t| t.total).sum();
    for sum in [region_sum, product_sum, quarter_sum] {
        assert!((sum - revenue).abs() < 1e-6);
    }

    let products = strings(&outcome.data, PRODUCT);
    assert_eq!(analysis.by_product.len(), {
        let mut distinct = products.clone();
        distinct.sort();
        distinct.dedup();
        distinct.len()
    });
}
