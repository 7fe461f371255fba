//! CLI entry point for the messy sales data generator.

use anyhow::Result;
use clap::Parser;
use sales_processing::config::DEFAULT_RAW_DATA_PATH;
use sales_processing::reporting::console::print_generation_summary;
use sales_processing::{DataGenerator, GeneratorConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Generate a synthetic sales CSV with injected data-quality defects",
    long_about = "Generate a synthetic sales CSV with injected data-quality defects.\n\n\
                  EXAMPLES:\n  \
                  # Default: 200 rows + 10 duplicates to data/messy_sales_data.csv\n  \
                  sales-generate\n\n  \
                  # Reproducible output\n  \
                  sales-generate --seed 42 -o data/sample.csv"
)]
struct Args {
    /// Path of the CSV file to write
    #[arg(short, long, default_value = DEFAULT_RAW_DATA_PATH)]
    output: String,

    /// Number of distinct generated rows
    #[arg(short, long, default_value = "200")]
    rows: usize,

    /// Number of exact duplicate rows appended before shuffling
    #[arg(short, long, default_value = "10")]
    duplicates: usize,

    /// Seed for reproducible output (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors in the log
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet);

    let mut builder = GeneratorConfig::builder()
        .rows(args.rows)
        .duplicate_rows(args.duplicates)
        .output_path(&args.output);

    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }

    let config = builder.build()?;
    info!(
        "Generating {} rows ({} duplicates)",
        config.total_rows(),
        config.duplicate_rows
    );

    let summary = DataGenerator::new(config).write_csv()?;
    print_generation_summary(&summary);

    Ok(())
}
