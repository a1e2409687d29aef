//! Polars AnyValue utility functions.

use polars::prelude::*;

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
///
/// Handles integer types, floating-point types, and string parsing.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Reads a column as `f64` values, row by row.
///
/// Values that cannot be read as numbers come back as `None`.
pub fn numeric_column_f64(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        values.push(any_to_f64(value));
    }
    Ok(values)
}

/// Formats a float the way survey codes appear once a column has been widened
/// to floating point: integral values keep a trailing `.0`.
///
/// # Examples
///
/// ```
/// use nsmo_common::format_float_label;
///
/// assert_eq!(format_float_label(1.0), "1.0");
/// assert_eq!(format_float_label(2.5), "2.5");
/// assert_eq!(format_float_label(-3.0), "-3.0");
/// ```
pub fn format_float_label(v: f64) -> String {
    format!("{v:?}")
}

/// Renders a cell as a category label, `None` for nulls.
///
/// Floats keep their `.0` suffix (see [`format_float_label`]); booleans render
/// as `True`/`False`.
pub fn category_label(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(v.to_string()),
        AnyValue::Int16(v) => Some(v.to_string()),
        AnyValue::Int32(v) => Some(v.to_string()),
        AnyValue::Int64(v) => Some(v.to_string()),
        AnyValue::UInt8(v) => Some(v.to_string()),
        AnyValue::UInt16(v) => Some(v.to_string()),
        AnyValue::UInt32(v) => Some(v.to_string()),
        AnyValue::UInt64(v) => Some(v.to_string()),
        AnyValue::Float32(v) if v.is_nan() => None,
        AnyValue::Float32(v) => Some(format_float_label(f64::from(v))),
        AnyValue::Float64(v) if v.is_nan() => None,
        AnyValue::Float64(v) => Some(format_float_label(v)),
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Boolean(b) => Some(if b { "True" } else { "False" }.to_string()),
        other => Some(other.to_string()),
    }
}
