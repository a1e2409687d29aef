//! JSON output of the emitted variable classification.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use nsmo_model::CleanedVariables;

use crate::common::ensure_parent_dir;

/// Write the classification as pretty JSON with sorted keys.
pub fn write_variables_json(path: &Path, variables: &CleanedVariables) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut json =
        serde_json::to_string_pretty(variables).context("serialize cleaned variables")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Read a classification written by [`write_variables_json`].
pub fn read_variables_json(path: &Path) -> Result<CleanedVariables> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}
