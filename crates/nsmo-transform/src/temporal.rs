//! Monthly aggregation of the daily yield series.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use nsmo_common::any_to_f64;
use nsmo_model::YieldColumns;
use polars::prelude::*;

use crate::error::{Result, TransformError};
use crate::normalization::MISSING_PLACEHOLDER;

/// Year column of the aggregate table.
pub const OBSERVATION_YEAR: &str = "observation_year";
/// Month column of the aggregate table.
pub const OBSERVATION_MONTH: &str = "observation_month";

/// Mean rate for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyYield {
    pub year: i32,
    pub month: u32,
    /// `None` when every observation of the month is null.
    pub rate: Option<f64>,
}

/// One row per observed (year, month), in calendar order.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyYields {
    rate_column: String,
    months: Vec<MonthlyYield>,
}

impl MonthlyYields {
    pub fn new(rate_column: impl Into<String>, months: Vec<MonthlyYield>) -> Self {
        Self {
            rate_column: rate_column.into(),
            months,
        }
    }

    /// Name of the rate column once joined onto the survey table.
    pub fn rate_column(&self) -> &str {
        &self.rate_column
    }

    pub fn months(&self) -> &[MonthlyYield] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn get(&self, year: i32, month: u32) -> Option<&MonthlyYield> {
        self.months
            .iter()
            .find(|m| m.year == year && m.month == month)
    }

    /// Render as a table with `observation_year`, `observation_month` and the
    /// rate column.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let years: Vec<i32> = self.months.iter().map(|m| m.year).collect();
        let months: Vec<i32> = self.months.iter().map(|m| m.month as i32).collect();
        let rates: Vec<Option<f64>> = self.months.iter().map(|m| m.rate).collect();
        let df = DataFrame::new(vec![
            Series::new(OBSERVATION_YEAR.into(), years).into_column(),
            Series::new(OBSERVATION_MONTH.into(), months).into_column(),
            Series::new(self.rate_column.as_str().into(), rates).into_column(),
        ])?;
        Ok(df)
    }
}

/// Group daily observations by calendar month and average the rate.
///
/// Nulls and the `.` placeholder in the rate column are ignored by the mean.
/// A month whose observations are all null is kept with a null rate. Rows
/// with a null date carry no month and are skipped; a date that does not
/// match `columns.date_format` is an error.
pub fn aggregate_monthly(yields: &DataFrame, columns: &YieldColumns) -> Result<MonthlyYields> {
    let dates = yields
        .column(&columns.date)
        .map_err(|_| TransformError::ColumnNotFound(columns.date.clone()))?
        .cast(&DataType::String)?;
    let rates = yields
        .column(&columns.rate)
        .map_err(|_| TransformError::ColumnNotFound(columns.rate.clone()))?;

    let mut groups: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in 0..yields.height() {
        let Some(raw_date) = dates.get(row)?.get_str().map(str::to_string) else {
            skipped += 1;
            continue;
        };
        let date = NaiveDate::parse_from_str(raw_date.trim(), &columns.date_format).map_err(
            |_| TransformError::InvalidDate {
                column: columns.date.clone(),
                row,
                value: raw_date.clone(),
            },
        )?;
        let rate = rate_value(rates.get(row)?, &columns.rate, row)?;

        let entry = groups.entry((date.year(), date.month())).or_insert((0.0, 0));
        if let Some(rate) = rate {
            entry.0 += rate;
            entry.1 += 1;
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, column = %columns.date, "observations without a date skipped");
    }

    let months = groups
        .into_iter()
        .map(|((year, month), (sum, count))| MonthlyYield {
            year,
            month,
            rate: (count > 0).then(|| sum / count as f64),
        })
        .collect();

    Ok(MonthlyYields::new(columns.rate.clone(), months))
}

fn rate_value(value: AnyValue<'_>, column: &str, row: usize) -> Result<Option<f64>> {
    let text = match &value {
        AnyValue::Null => return Ok(None),
        AnyValue::String(s) => Some(s.trim().to_string()),
        AnyValue::StringOwned(s) => Some(s.trim().to_string()),
        _ => None,
    };
    match text {
        Some(text) if text.is_empty() || text == MISSING_PLACEHOLDER => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| TransformError::NonNumericValue {
                column: column.to_string(),
                row,
                value: text,
            }),
        None => match any_to_f64(value.clone()) {
            Some(v) if v.is_nan() => Ok(None),
            Some(v) => Ok(Some(v)),
            None => Err(TransformError::NonNumericValue {
                column: column.to_string(),
                row,
                value: value.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yields(dates: &[&str], rates: &[Option<f64>]) -> DataFrame {
        df!(
            "observation_date" => dates,
            "DGS30" => rates,
        )
        .unwrap()
    }

    #[test]
    fn averages_each_month() {
        let df = yields(
            &["2020-03-02", "2020-03-03", "2020-04-01", "2020-03-31"],
            &[Some(0.8), Some(1.1), Some(2.0), Some(1.1)],
        );
        let monthly = aggregate_monthly(&df, &YieldColumns::default()).unwrap();

        assert_eq!(monthly.len(), 2);
        let march = monthly.get(2020, 3).unwrap();
        assert!((march.rate.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(monthly.get(2020, 4).unwrap().rate, Some(2.0));
    }

    #[test]
    fn all_null_month_is_kept() {
        let df = yields(&["2021-01-04", "2021-02-01"], &[None, Some(1.5)]);
        let monthly = aggregate_monthly(&df, &YieldColumns::default()).unwrap();

        assert_eq!(monthly.get(2021, 1).unwrap().rate, None);
        assert_eq!(monthly.get(2021, 2).unwrap().rate, Some(1.5));
    }

    #[test]
    fn placeholder_rates_are_ignored() {
        let df = df!(
            "observation_date" => ["2020-03-02", "2020-03-03", "2020-03-04"],
            "DGS30" => [".", "1.0", "2.0"],
        )
        .unwrap();
        let monthly = aggregate_monthly(&df, &YieldColumns::default()).unwrap();
        assert_eq!(monthly.get(2020, 3).unwrap().rate, Some(1.5));
    }

    #[test]
    fn malformed_date_is_fatal() {
        let df = yields(&["2020-03-02", "03/04/2020"], &[Some(1.0), Some(1.0)]);
        let err = aggregate_monthly(&df, &YieldColumns::default()).unwrap_err();
        assert!(matches!(err, TransformError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn frame_has_one_row_per_month() {
        let df = yields(
            &["2019-12-31", "2020-01-02", "2020-01-03"],
            &[Some(2.0), Some(2.2), Some(2.4)],
        );
        let frame = aggregate_monthly(&df, &YieldColumns::default())
            .unwrap()
            .to_frame()
            .unwrap();

        assert_eq!(frame.height(), 2);
        assert_eq!(
            frame.get_column_names_str(),
            vec![OBSERVATION_YEAR, OBSERVATION_MONTH, "DGS30"]
        );
        assert_eq!(
            frame.column(OBSERVATION_MONTH).unwrap().get(0).unwrap(),
            AnyValue::Int32(12)
        );
    }
}
