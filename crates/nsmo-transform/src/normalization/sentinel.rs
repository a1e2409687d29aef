//! Sentinel missing-value normalization.
//!
//! The survey encodes "not applicable" and "missing" as negative codes or as a
//! literal `.`. Both become null here so that later arithmetic never sees them.
//! Columns named in the exclusion set, by name or by format code, pass through
//! untouched since they carry legitimate negative values.

use std::collections::BTreeMap;

use nsmo_common::any_to_f64;
use nsmo_model::{ExclusionSet, FormatMap};
use polars::prelude::*;

use crate::error::{Result, TransformError};

/// The placeholder the survey uses for a missing value.
pub const MISSING_PLACEHOLDER: &str = ".";

/// What normalization changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentinelReport {
    /// Values turned into nulls, per column. Only columns with changes are listed.
    pub nulled: BTreeMap<String, usize>,
    /// Columns skipped because of the exclusion set.
    pub excluded: Vec<String>,
}

impl SentinelReport {
    pub fn total_nulled(&self) -> usize {
        self.nulled.values().sum()
    }
}

/// Replace sentinel values with nulls in every non-excluded column.
///
/// Integer columns stay integer typed. Text columns are parsed as numbers once
/// placeholders are removed; any remaining non-numeric text is an error.
/// Columns of other types cannot hold sentinels and are left as they are.
pub fn normalize_sentinels(
    df: &DataFrame,
    formats: &FormatMap,
    exclusions: &ExclusionSet,
) -> Result<(DataFrame, SentinelReport)> {
    let mut report = SentinelReport::default();
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().as_str();
        if exclusions.excludes(name, formats.get(name)) {
            tracing::debug!(column = %name, "excluded from sentinel normalization");
            report.excluded.push(name.to_string());
            columns.push(column.clone());
            continue;
        }

        let (normalized, nulled) = match column.dtype() {
            DataType::String => normalize_text(column)?,
            dtype if dtype.is_integer() => normalize_integer(column)?,
            dtype if dtype.is_float() => normalize_float(column),
            _ => (column.clone(), 0),
        };
        if nulled > 0 {
            report.nulled.insert(name.to_string(), nulled);
        }
        columns.push(normalized);
    }

    let normalized = DataFrame::new(columns)?;
    Ok((normalized, report))
}

fn normalize_integer(column: &Column) -> Result<(Column, usize)> {
    let cast = column.cast(&DataType::Int64)?;
    let ca = cast.as_materialized_series().i64()?;
    let mut nulled = 0usize;
    let values: Vec<Option<i64>> = ca
        .into_iter()
        .map(|value| match value {
            Some(v) if v < 0 => {
                nulled += 1;
                None
            }
            other => other,
        })
        .collect();
    Ok((Series::new(column.name().clone(), values).into_column(), nulled))
}

fn normalize_float(column: &Column) -> (Column, usize) {
    let mut nulled = 0usize;
    let values: Vec<Option<f64>> = (0..column.len())
        .map(|idx| {
            let value = column.get(idx).map(any_to_f64).unwrap_or(None);
            match value {
                Some(v) if v < 0.0 => {
                    nulled += 1;
                    None
                }
                other => other,
            }
        })
        .collect();
    (Series::new(column.name().clone(), values).into_column(), nulled)
}

fn normalize_text(column: &Column) -> Result<(Column, usize)> {
    let name = column.name().as_str();
    let ca = column.as_materialized_series().str()?;
    let mut nulled = 0usize;
    let mut values: Vec<Option<f64>> = Vec::with_capacity(ca.len());

    for (row, value) in ca.into_iter().enumerate() {
        let Some(raw) = value else {
            values.push(None);
            continue;
        };
        let trimmed = raw.trim();
        if trimmed == MISSING_PLACEHOLDER {
            nulled += 1;
            values.push(None);
            continue;
        }
        if trimmed.is_empty() {
            values.push(None);
            continue;
        }
        let parsed = trimmed
            .parse::<f64>()
            .map_err(|_| TransformError::NonNumericValue {
                column: name.to_string(),
                row,
                value: raw.to_string(),
            })?;
        if parsed < 0.0 {
            nulled += 1;
            values.push(None);
        } else {
            values.push(Some(parsed));
        }
    }

    Ok((Series::new(column.name().clone(), values).into_column(), nulled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsmo_common::numeric_column_f64;

    fn formats() -> FormatMap {
        [
            ("x_count", "NUMFM"),
            ("x_status", "PSTATFM"),
            ("rate_spread", "SPREADFM"),
            ("x_text", "NUMFM"),
            ("pmms", "NUMFM"),
        ]
        .into_iter()
        .collect()
    }

    fn series<'a>(df: &'a DataFrame, name: &str) -> &'a Series {
        df.column(name).unwrap().as_materialized_series()
    }

    #[test]
    fn negative_integers_become_null() {
        let df = df!("x_count" => [3i64, -1, 0, -5]).unwrap();
        let (out, report) =
            normalize_sentinels(&df, &formats(), &ExclusionSet::survey_default()).unwrap();

        assert_eq!(series(&out, "x_count").dtype(), &DataType::Int64);
        assert_eq!(
            numeric_column_f64(&out, "x_count").unwrap(),
            vec![Some(3.0), None, Some(0.0), None]
        );
        assert_eq!(report.nulled.get("x_count"), Some(&2));
    }

    #[test]
    fn dot_placeholder_and_negatives_in_text() {
        let df = df!("x_text" => [Some("1.5"), Some("."), Some("-2"), None]).unwrap();
        let (out, report) =
            normalize_sentinels(&df, &formats(), &ExclusionSet::survey_default()).unwrap();

        assert_eq!(series(&out, "x_text").dtype(), &DataType::Float64);
        assert_eq!(
            numeric_column_f64(&out, "x_text").unwrap(),
            vec![Some(1.5), None, None, None]
        );
        assert_eq!(report.total_nulled(), 2);
    }

    #[test]
    fn excluded_by_format_and_by_name_are_untouched() {
        let df = df!(
            "x_status" => [-5i64, 1],
            "rate_spread" => [-0.25, 0.5],
            "pmms" => [-1.0, 3.5],
        )
        .unwrap();
        let (out, report) =
            normalize_sentinels(&df, &formats(), &ExclusionSet::survey_default()).unwrap();

        assert!(series(&out, "x_status").equals_missing(series(&df, "x_status")));
        assert!(series(&out, "rate_spread").equals_missing(series(&df, "rate_spread")));
        assert_eq!(report.excluded, vec!["x_status", "rate_spread"]);
        assert_eq!(
            numeric_column_f64(&out, "pmms").unwrap(),
            vec![None, Some(3.5)]
        );
    }

    #[test]
    fn non_numeric_text_is_fatal() {
        let df = df!("x_text" => ["1", "abc"]).unwrap();
        let err =
            normalize_sentinels(&df, &formats(), &ExclusionSet::survey_default()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::NonNumericValue { row: 1, .. }
        ));
    }

    #[test]
    fn excluded_format_keeps_negative_code() {
        let formats: FormatMap = [("a", "NUMFM"), ("b", "PSTATFM")].into_iter().collect();
        let df = df!("a" => [-5i64], "b" => [-5i64]).unwrap();
        let (out, _) =
            normalize_sentinels(&df, &formats, &ExclusionSet::survey_default()).unwrap();

        assert_eq!(series(&out, "a").get(0).unwrap(), AnyValue::Null);
        assert_eq!(series(&out, "b").get(0).unwrap(), AnyValue::Int64(-5));
    }
}
