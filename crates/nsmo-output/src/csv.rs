//! CSV output of the prepared table.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::common::ensure_parent_dir;

/// Write `df` as comma separated values with a header row.
///
/// Nulls are written as empty fields, indicator columns as `true`/`false`.
pub fn write_csv_table(path: &Path, df: &DataFrame) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut frame = df.clone();
    CsvWriter::new(&mut writer)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
