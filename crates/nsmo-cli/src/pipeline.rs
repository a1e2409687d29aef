//! File-based preparation run: ingest, transform, write.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use nsmo_ingest::{check_primary_columns, load_metadata, load_pipeline_options, read_csv_table};
use nsmo_model::{MetadataBundle, PipelineOptions, WinsorLimits};
use nsmo_output::{write_csv_table, write_variables_json};
use nsmo_transform::{PreparedData, run_pipeline};

/// Input and output locations of a run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub survey: PathBuf,
    pub yields: PathBuf,
    pub metadata_dir: PathBuf,
    pub output: PathBuf,
    pub variables_out: PathBuf,
}

/// Option values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub winsor_lower: Option<f64>,
    pub winsor_upper: Option<f64>,
    pub encode_nulls: bool,
    pub strict: bool,
}

/// Options file first, then explicit flags on top.
///
/// A single winsor flag replaces only its own limit; the pair is validated
/// after merging.
pub fn resolve_options(
    config: Option<&Path>,
    overrides: &OptionOverrides,
) -> Result<PipelineOptions> {
    let mut options = match config {
        Some(path) => load_pipeline_options(path)
            .with_context(|| format!("load options from {}", path.display()))?,
        None => PipelineOptions::default(),
    };
    if overrides.winsor_lower.is_some() || overrides.winsor_upper.is_some() {
        options.winsor = WinsorLimits::new(
            overrides.winsor_lower.unwrap_or(options.winsor.lower),
            overrides.winsor_upper.unwrap_or(options.winsor.upper),
        )
        .context("winsorization limits")?;
    }
    options.encode_nulls |= overrides.encode_nulls;
    options.strict_classification |= overrides.strict;
    Ok(options)
}

/// Tables and metadata read from disk.
#[derive(Debug)]
pub struct Inputs {
    pub survey: DataFrame,
    pub yields: DataFrame,
    pub metadata: MetadataBundle,
}

/// Result of a file-based run.
#[derive(Debug)]
pub struct RunOutcome {
    pub prepared: PreparedData,
    /// Files written, empty on a dry run.
    pub written: Vec<PathBuf>,
}

/// Read the survey, the yield series and the metadata directory.
pub fn ingest(paths: &RunPaths, options: &PipelineOptions) -> Result<Inputs> {
    let span = info_span!(
        "ingest",
        survey = %paths.survey.display(),
        yields = %paths.yields.display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let metadata = load_metadata(&paths.metadata_dir)
        .with_context(|| format!("load metadata from {}", paths.metadata_dir.display()))?;
    let survey = read_csv_table(&paths.survey)
        .with_context(|| format!("read {}", paths.survey.display()))?;
    let yields = read_csv_table(&paths.yields)
        .with_context(|| format!("read {}", paths.yields.display()))?;
    if options.strict_classification {
        check_primary_columns(&metadata.formats, &survey)
            .with_context(|| format!("check formats of {}", paths.survey.display()))?;
    }

    info!(
        survey_rows = survey.height(),
        survey_columns = survey.width(),
        yield_rows = yields.height(),
        formats = metadata.formats.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(Inputs {
        survey,
        yields,
        metadata,
    })
}

/// Write the prepared table and the emitted variables.
pub fn write_outputs(paths: &RunPaths, prepared: &PreparedData) -> Result<Vec<PathBuf>> {
    let _guard = info_span!("output").entered();
    let start = Instant::now();
    write_csv_table(&paths.output, &prepared.table)?;
    write_variables_json(&paths.variables_out, &prepared.variables)?;
    info!(
        table = %paths.output.display(),
        variables = %paths.variables_out.display(),
        duration_ms = start.elapsed().as_millis(),
        "outputs written"
    );
    Ok(vec![paths.output.clone(), paths.variables_out.clone()])
}

/// Ingest, run every stage, then write unless `dry_run`.
pub fn run(paths: &RunPaths, options: &PipelineOptions, dry_run: bool) -> Result<RunOutcome> {
    let inputs = ingest(paths, options)?;
    let prepared = run_pipeline(
        &inputs.survey,
        &inputs.yields,
        &inputs.metadata,
        options,
    )
    .context("prepare survey data")?;
    let written = if dry_run {
        info!("dry run, nothing written");
        Vec::new()
    } else {
        write_outputs(paths, &prepared)?
    };
    Ok(RunOutcome { prepared, written })
}
