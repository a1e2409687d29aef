//! Left join of the monthly yields onto the survey table.
//!
//! The key is composite: `open_year == observation_year` and
//! `open_month == observation_month`. Only the rate column is attached, so
//! the aggregate's key columns never reach the joined schema.

use std::collections::HashMap;

use nsmo_common::any_to_f64;
use nsmo_model::MortgageColumns;
use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::temporal::MonthlyYields;

/// Attach the monthly rate to every survey row.
///
/// Every survey row is kept in its original order. Rows whose year or month is
/// null, or has no matching month in `yields`, get a null rate. Duplicate
/// months in `yields` are rejected before anything is attached.
pub fn join_monthly_yields(
    survey: &DataFrame,
    yields: &MonthlyYields,
    columns: &MortgageColumns,
) -> Result<DataFrame> {
    let rate_column = yields.rate_column();
    if survey.column(rate_column).is_ok() {
        return Err(TransformError::JoinColumnCollision(rate_column.to_string()));
    }

    let mut lookup: HashMap<(i32, u32), Option<f64>> = HashMap::with_capacity(yields.len());
    for month in yields.months() {
        if lookup.insert((month.year, month.month), month.rate).is_some() {
            return Err(TransformError::JoinAmbiguity {
                year: month.year,
                month: month.month as i32,
            });
        }
    }

    let years = key_column(survey, &columns.open_year)?;
    let months = key_column(survey, &columns.open_month)?;

    let mut matched = 0usize;
    let rates: Vec<Option<f64>> = years
        .iter()
        .zip(&months)
        .map(|(year, month)| {
            let year: i32 = (*year)?.try_into().ok()?;
            let month: u32 = (*month)?.try_into().ok()?;
            let rate = lookup.get(&(year, month)).copied();
            if rate.is_some() {
                matched += 1;
            }
            rate.flatten()
        })
        .collect();

    tracing::debug!(
        rows = survey.height(),
        matched,
        unmatched = survey.height() - matched,
        "monthly yields joined"
    );

    let mut joined = survey.clone();
    joined.with_column(Series::new(rate_column.into(), rates))?;
    Ok(joined)
}

/// Read a year or month key column. Non-integral values can never match and
/// are treated like nulls.
fn key_column(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df
        .column(name)
        .map_err(|_| TransformError::ColumnNotFound(name.to_string()))?;
    (0..df.height())
        .map(|idx| -> Result<Option<i64>> {
            let value = column.get(idx)?;
            Ok(any_to_f64(value)
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64))
        })
        .collect()
}
