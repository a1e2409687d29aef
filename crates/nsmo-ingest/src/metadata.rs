//! TOML loading for the three metadata dictionaries.
//!
//! A metadata directory holds:
//!
//! - `variable_formats.toml`: a `[formats]` table of column name to format code
//! - `category_catalog.toml`: one table per categorical format code, category code to label
//! - `exclusions.toml` (optional): `names = [...]`, column names or format codes
//!   exempt from sentinel normalization

use std::path::Path;

use polars::prelude::DataFrame;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use nsmo_model::{
    CategoryCatalog, ExclusionSet, FormatMap, MetadataBundle, PipelineOptions,
};

use crate::error::{IngestError, Result};

pub const VARIABLE_FORMATS_FILE: &str = "variable_formats.toml";
pub const CATEGORY_CATALOG_FILE: &str = "category_catalog.toml";
pub const EXCLUSIONS_FILE: &str = "exclusions.toml";

#[derive(Debug, Deserialize)]
struct VariableFormatsFile {
    formats: FormatMap,
}

#[derive(Debug, Deserialize)]
struct ExclusionsFile {
    names: ExclusionSet,
}

fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    toml::from_str(&contents).map_err(|e| IngestError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn load_format_map(path: &Path) -> Result<FormatMap> {
    let file: VariableFormatsFile = load_toml(path)?;
    Ok(file.formats)
}

pub fn load_category_catalog(path: &Path) -> Result<CategoryCatalog> {
    load_toml(path)
}

pub fn load_exclusions(path: &Path) -> Result<ExclusionSet> {
    let file: ExclusionsFile = load_toml(path)?;
    Ok(file.names)
}

/// Load pipeline options; keys left out of the file keep their defaults.
pub fn load_pipeline_options(path: &Path) -> Result<PipelineOptions> {
    let options: PipelineOptions = load_toml(path)?;
    options.winsor.validate()?;
    Ok(options)
}

/// Load all three dictionaries from `dir`.
///
/// A missing exclusions file falls back to [`ExclusionSet::survey_default`].
pub fn load_metadata(dir: &Path) -> Result<MetadataBundle> {
    let formats = load_format_map(&dir.join(VARIABLE_FORMATS_FILE))?;
    let catalog = load_category_catalog(&dir.join(CATEGORY_CATALOG_FILE))?;
    let exclusions_path = dir.join(EXCLUSIONS_FILE);
    let exclusions = if exclusions_path.exists() {
        load_exclusions(&exclusions_path)?
    } else {
        tracing::info!(
            path = %exclusions_path.display(),
            "no exclusions file, using survey defaults"
        );
        ExclusionSet::survey_default()
    };
    tracing::debug!(
        formats = formats.len(),
        categorical_formats = catalog.len(),
        exclusions = exclusions.len(),
        "loaded metadata"
    );
    Ok(MetadataBundle {
        formats,
        catalog,
        exclusions,
    })
}

/// Every column of the survey table must have a format code.
pub fn check_primary_columns(formats: &FormatMap, df: &DataFrame) -> Result<()> {
    let names = df.get_column_names();
    formats.require_columns(names.iter().map(|name| name.as_str()))?;
    Ok(())
}
