//! The preparation stages chained in order.

use std::time::Instant;

use nsmo_model::{CleanedVariables, MetadataBundle, PipelineOptions, VariableClassification};
use polars::prelude::*;
use tracing::{info, info_span};

use crate::classify::classify_variables;
use crate::derive::{BetaSummary, add_beta_columns};
use crate::emit::emit_variables;
use crate::encode::{EncodingReport, encode_categoricals};
use crate::error::{Result, TransformError};
use crate::join::join_monthly_yields;
use crate::normalization::{SentinelReport, normalize_sentinels};
use crate::temporal::aggregate_monthly;

/// Counts collected across a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub input_rows: usize,
    pub input_columns: usize,
    pub yield_observations: usize,
    pub months: usize,
    pub output_rows: usize,
    pub output_columns: usize,
    pub categorical: usize,
    pub numeric: usize,
    pub unclassified: usize,
    pub sentinels_nulled: usize,
    pub indicators: usize,
    pub beta: BetaSummary,
}

/// Output of a full run.
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// The encoded, joined and derived table.
    pub table: DataFrame,
    pub variables: CleanedVariables,
    pub classification: VariableClassification,
    pub sentinels: SentinelReport,
    pub encoding: EncodingReport,
    pub summary: RunSummary,
}

/// Run every stage on the survey and yield tables.
///
/// Fails at the first erroring stage; nothing partial is returned.
pub fn run_pipeline(
    survey: &DataFrame,
    yields: &DataFrame,
    metadata: &MetadataBundle,
    options: &PipelineOptions,
) -> Result<PreparedData> {
    options.winsor.validate()?;

    let classification = info_span!("classify").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let partition = metadata.partition();
        let classification = classify_variables(
            survey.get_column_names().into_iter().map(PlSmallStr::as_str),
            &metadata.formats,
            &partition,
        );
        info!(
            categorical = classification.categorical().len(),
            numeric = classification.numeric().len(),
            unclassified = classification.issues().len(),
            duration_ms = start.elapsed().as_millis(),
            "classification complete"
        );
        if options.strict_classification && classification.has_issues() {
            return Err(TransformError::Unclassified(
                classification.issues().to_vec(),
            ));
        }
        Ok(classification)
    })?;

    let (normalized, sentinels) = info_span!("normalize").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let result = normalize_sentinels(survey, &metadata.formats, &metadata.exclusions)?;
        info!(
            nulled = result.1.total_nulled(),
            excluded = result.1.excluded.len(),
            duration_ms = start.elapsed().as_millis(),
            "sentinel normalization complete"
        );
        Ok(result)
    })?;

    let monthly = info_span!("aggregate").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let monthly = aggregate_monthly(yields, &options.yields)?;
        info!(
            observations = yields.height(),
            months = monthly.len(),
            duration_ms = start.elapsed().as_millis(),
            "monthly aggregation complete"
        );
        Ok(monthly)
    })?;

    let joined = info_span!("join").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let joined = join_monthly_yields(&normalized, &monthly, &options.mortgage)?;
        info!(
            rows = joined.height(),
            columns = joined.width(),
            duration_ms = start.elapsed().as_millis(),
            "join complete"
        );
        Ok(joined)
    })?;

    let (derived, beta) = info_span!("derive").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let result = add_beta_columns(
            &joined,
            &options.mortgage,
            monthly.rate_column(),
            options.winsor,
        )?;
        info!(
            rows = result.0.height(),
            nulls = result.1.nulls,
            non_finite = result.1.non_finite,
            duration_ms = start.elapsed().as_millis(),
            "Beta derived"
        );
        Ok(result)
    })?;

    let (table, encoding) = info_span!("encode").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let result = encode_categoricals(
            &derived,
            &classification,
            &metadata.catalog,
            options.encode_nulls,
        )?;
        info!(
            encoded = result.1.encoded.len(),
            indicators = result.1.indicators.len(),
            columns = result.0.width(),
            duration_ms = start.elapsed().as_millis(),
            "encoding complete"
        );
        Ok(result)
    })?;

    let variables = emit_variables(&classification);

    let summary = RunSummary {
        input_rows: survey.height(),
        input_columns: survey.width(),
        yield_observations: yields.height(),
        months: monthly.len(),
        output_rows: table.height(),
        output_columns: table.width(),
        categorical: classification.categorical().len(),
        numeric: classification.numeric().len(),
        unclassified: classification.issues().len(),
        sentinels_nulled: sentinels.total_nulled(),
        indicators: encoding.indicators.len(),
        beta,
    };

    Ok(PreparedData {
        table,
        variables,
        classification,
        sentinels,
        encoding,
        summary,
    })
}
