use anyhow::{Context, Result};
use tracing::info_span;

use nsmo_cli::formats::{format_rows, formats_table};
use nsmo_cli::pipeline::{OptionOverrides, RunOutcome, RunPaths, resolve_options, run};
use nsmo_ingest::load_metadata;

use crate::cli::{FormatsArgs, RunArgs};

pub fn run_prepare(args: &RunArgs) -> Result<RunOutcome> {
    let _guard = info_span!("run", survey = %args.survey.display()).entered();
    let overrides = OptionOverrides {
        winsor_lower: args.winsor_lower,
        winsor_upper: args.winsor_upper,
        encode_nulls: args.encode_nulls,
        strict: args.strict,
    };
    let options = resolve_options(args.config.as_deref(), &overrides)?;
    let paths = RunPaths {
        survey: args.survey.clone(),
        yields: args.yields.clone(),
        metadata_dir: args.metadata_dir.clone(),
        output: args.output.clone(),
        variables_out: args.variables_out.clone(),
    };
    run(&paths, &options, args.dry_run)
}

pub fn run_formats(args: &FormatsArgs) -> Result<()> {
    let metadata = load_metadata(&args.metadata_dir)
        .with_context(|| format!("load metadata from {}", args.metadata_dir.display()))?;
    println!("{}", formats_table(&format_rows(&metadata)));
    Ok(())
}
