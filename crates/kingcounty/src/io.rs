use std::{fs::File, path::Path};

use anyhow::{bail, Context, Result};
use polars::prelude::*;

/// Loads a sales table, choosing the reader from the file extension.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let df = match extension.as_str() {
        // Full inference: sqft_basement carries '?' markers deep into the file.
        "csv" => CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        "json" => JsonReader::new(open(path)?).finish()?,
        "parquet" => ParquetReader::new(open(path)?).finish()?,
        _ => bail!(
            "unsupported file extension for {} (supported: csv, json, parquet)",
            path.display()
        ),
    };

    Ok(df)
}

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}
