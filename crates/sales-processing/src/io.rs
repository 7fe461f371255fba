//! CSV input and output.
//!
//! Raw files are loaded with every column as `String` so that the cleaner,
//! not schema inference, decides how each value is parsed. Writes always
//! replace the target file.

use crate::error::{Result, ResultExt};
use crate::schema::NA_TOKENS;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV with a header row, keeping every column as `String`.
///
/// Empty cells and any of [`NA_TOKENS`] become nulls.
pub fn read_raw_csv(path: &Path) -> Result<DataFrame> {
    debug!("Opening {}", path.display());
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;

    let null_values = NullValues::AllColumns(NA_TOKENS.iter().map(|t| (*t).into()).collect());
    let parse_options = CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(Some(null_values));

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(file)
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;

    info!("Loaded {} rows x {} columns from {}", df.height(), df.width(), path.display());
    Ok(df)
}

/// Write a DataFrame as comma-separated CSV with a header row.
///
/// Creates the parent directory if needed and overwrites any existing file.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
    }

    let mut file = File::create(path).context(format!("Failed to create {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("Failed to write {}", path.display()))?;

    info!("Saved {} rows to {}", df.height(), path.display());
    Ok(())
}
