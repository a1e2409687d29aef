//! The `Beta` ratio and its winsorized copy.
//!
//! `Beta = (rate_spread + pmms - yield) / (pmms - yield)`. When
//! `pmms == yield` the ratio is infinite (or NaN for `0 / 0`); that value is
//! kept in `Beta` as computed. Winsorization estimates its bounds from the
//! finite values only, clips infinities to the nearest bound and turns NaN
//! into null.

use nsmo_common::numeric_column_f64;
use nsmo_model::{MortgageColumns, WinsorLimits};
use polars::prelude::*;

use crate::error::{Result, TransformError};

/// Raw ratio column.
pub const BETA: &str = "Beta";
/// Ratio with both tails clipped.
pub const BETA_WINSORIZED: &str = "Beta_winsorized";

/// Clip bounds computed from the finite `Beta` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinsorBounds {
    pub lower: f64,
    pub upper: f64,
}

/// Counts describing the derived columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BetaSummary {
    pub rows: usize,
    pub nulls: usize,
    pub non_finite: usize,
    /// `None` when no row has a finite `Beta`.
    pub bounds: Option<WinsorBounds>,
}

/// Ratio for one row; `None` when any input is missing.
///
/// ```
/// use nsmo_transform::derive_beta;
///
/// let beta = derive_beta(Some(1.2), Some(3.5), Some(1.0)).unwrap();
/// assert!((beta - 1.48).abs() < 1e-12);
/// assert_eq!(derive_beta(None, Some(3.5), Some(1.0)), None);
/// assert!(derive_beta(Some(1.0), Some(2.0), Some(2.0)).unwrap().is_infinite());
/// ```
pub fn derive_beta(
    rate_spread: Option<f64>,
    pmms: Option<f64>,
    yield_: Option<f64>,
) -> Option<f64> {
    let (spread, pmms, yield_) = (rate_spread?, pmms?, yield_?);
    Some((spread + pmms - yield_) / (pmms - yield_))
}

/// Quantile of sorted values by linear interpolation at position `q * (n - 1)`.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    let low = sorted[below];
    let high = sorted[above];
    Some(low + (high - low) * (position - below as f64))
}

/// Clip both tails of `values` at the given limits.
///
/// Bounds are the `limits.lower` and `1 - limits.upper` quantiles of the
/// finite values. Nulls stay null, NaN becomes null and infinities clip to
/// the nearest bound.
pub fn winsorize_values(
    values: &[Option<f64>],
    limits: WinsorLimits,
) -> (Vec<Option<f64>>, Option<WinsorBounds>) {
    let mut finite: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    finite.sort_by(f64::total_cmp);

    let bounds = quantile_linear(&finite, limits.lower)
        .zip(quantile_linear(&finite, 1.0 - limits.upper))
        .map(|(lower, upper)| WinsorBounds { lower, upper });

    let clipped = values
        .iter()
        .map(|value| match (*value, bounds) {
            (Some(v), _) if v.is_nan() => None,
            (Some(v), Some(b)) => Some(v.max(b.lower).min(b.upper)),
            (other, _) => other,
        })
        .collect();

    (clipped, bounds)
}

/// Add `Beta` and `Beta_winsorized` to the joined table.
///
/// `rate_column` is the joined monthly yield.
pub fn add_beta_columns(
    df: &DataFrame,
    columns: &MortgageColumns,
    rate_column: &str,
    limits: WinsorLimits,
) -> Result<(DataFrame, BetaSummary)> {
    limits.validate()?;

    let spread = read_numeric(df, &columns.rate_spread)?;
    let pmms = read_numeric(df, &columns.pmms)?;
    let yields = read_numeric(df, rate_column)?;

    let beta: Vec<Option<f64>> = spread
        .iter()
        .zip(&pmms)
        .zip(&yields)
        .map(|((s, p), y)| derive_beta(*s, *p, *y))
        .collect();
    let (winsorized, bounds) = winsorize_values(&beta, limits);

    let summary = BetaSummary {
        rows: beta.len(),
        nulls: beta.iter().filter(|v| v.is_none()).count(),
        non_finite: beta.iter().flatten().filter(|v| !v.is_finite()).count(),
        bounds,
    };
    if summary.non_finite > 0 {
        tracing::warn!(
            count = summary.non_finite,
            "Beta is undefined where pmms equals the monthly yield"
        );
    }

    let mut derived = df.clone();
    derived.with_column(Series::new(BETA.into(), beta))?;
    derived.with_column(Series::new(BETA_WINSORIZED.into(), winsorized))?;
    Ok((derived, summary))
}

fn read_numeric(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    if df.column(name).is_err() {
        return Err(TransformError::ColumnNotFound(name.to_string()));
    }
    Ok(numeric_column_f64(df, name)?)
}
