//! CLI entry point for the sales cleaner and analyzer.

use anyhow::{Result, anyhow};
use clap::Parser;
use sales_processing::config::{DEFAULT_OUTPUT_DIR, DEFAULT_RAW_DATA_PATH};
use sales_processing::reporting::console::print_analysis_report;
use sales_processing::{AnalyzerConfig, SalesPipeline};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean, analyze and export a messy sales CSV",
    long_about = "Clean, analyze and export a messy sales CSV.\n\n\
                  Writes clean_sales_data.csv, sales_by_region.csv and\n\
                  sales_by_product.csv to the output directory.\n\n\
                  EXAMPLES:\n  \
                  # Defaults: data/messy_sales_data.csv -> output/\n  \
                  sales-analyze\n\n  \
                  # Custom paths plus a JSON report\n  \
                  sales-analyze -i data/sample.csv -o results --emit-report"
)]
struct Args {
    /// Raw sales CSV to process
    #[arg(short, long, default_value = DEFAULT_RAW_DATA_PATH)]
    input: String,

    /// Directory for the output files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: String,

    /// Also write sales_report.json to the output directory
    #[arg(short = 'r', long)]
    emit_report: bool,

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

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = AnalyzerConfig::builder()
        .input_path(&args.input)
        .output_dir(&args.output_dir)
        .emit_report(args.emit_report)
        .build()?;

    let mut builder = SalesPipeline::builder().config(config);
    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    let outcome = builder.build()?.run().map_err(|e| {
        error!("Analysis failed [{}]: {}", e.error_code(), e);
        anyhow!("Analysis failed: {}", e)
    })?;

    print_analysis_report(&outcome);
    Ok(())
}
