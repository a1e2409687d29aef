//! One-hot encoding of categorical columns.
//!
//! Each categorical column is replaced by one boolean indicator per distinct
//! observed value, named `{column}_{value}`. Survey codes widened to floating
//! point render as `1.0`, `2.0`, ... so every `.0` is stripped from generated
//! names. Two output columns ending up with the same name is an error.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use nsmo_common::{category_label, parse_f64};
use nsmo_model::{CategoryCatalog, VariableClassification};
use polars::prelude::*;

use crate::error::{Result, TransformError};

const FLOAT_ARTIFACT: &str = ".0";
const NULL_SUFFIX: &str = "nan";

/// What the encoder produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingReport {
    /// Categorical columns that were replaced.
    pub encoded: Vec<String>,
    /// Indicator columns in output order.
    pub indicators: Vec<String>,
    /// Observed values not listed in the category catalog, per column.
    pub unknown_values: BTreeMap<String, usize>,
}

/// Remove every `.0` from a generated column name.
///
/// The substitution repeats until no `.0` is left.
///
/// ```
/// use nsmo_transform::strip_float_artifact;
///
/// assert_eq!(strip_float_artifact("x_gender_1.0"), "x_gender_1");
/// assert_eq!(strip_float_artifact("x_rate_2.5"), "x_rate_2.5");
/// ```
pub fn strip_float_artifact(name: &str) -> String {
    let mut stripped = name.to_string();
    while stripped.contains(FLOAT_ARTIFACT) {
        stripped = stripped.replace(FLOAT_ARTIFACT, "");
    }
    stripped
}

/// Replace every categorical column of `classification` with indicator columns.
///
/// Non-categorical columns come first in their original order, followed by
/// the indicators of each categorical column in classification order. Within
/// a column, values are ordered numerically when they are numbers. With
/// `encode_nulls`, a `{column}_nan` indicator is added for columns that
/// contain nulls.
pub fn encode_categoricals(
    df: &DataFrame,
    classification: &VariableClassification,
    catalog: &CategoryCatalog,
    encode_nulls: bool,
) -> Result<(DataFrame, EncodingReport)> {
    let categorical: HashSet<&str> = classification
        .categorical()
        .iter()
        .map(String::as_str)
        .collect();

    let mut report = EncodingReport::default();
    let mut names: HashMap<String, String> = HashMap::new();
    let mut output: Vec<Column> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().as_str();
        if categorical.contains(name) {
            continue;
        }
        register_name(&mut names, name.to_string(), name)?;
        output.push(column.clone());
    }

    for source in classification.categorical() {
        let column = df
            .column(source)
            .map_err(|_| TransformError::ColumnNotFound(source.clone()))?;
        let labels: Vec<Option<String>> = (0..column.len())
            .map(|idx| -> Result<Option<String>> { Ok(category_label(column.get(idx)?)) })
            .collect::<Result<_>>()?;

        let categories = distinct_sorted(&labels);
        if let Some(format_code) = classification.format_code(source)
            && catalog.contains_format(format_code)
        {
            let unknown = categories
                .iter()
                .filter(|label| !catalog.is_known_value(format_code, &catalog_code(label)))
                .count();
            if unknown > 0 {
                tracing::warn!(
                    column = %source,
                    format_code = %format_code,
                    unknown,
                    "observed values missing from the category catalog"
                );
                report.unknown_values.insert(source.clone(), unknown);
            }
        }

        for category in &categories {
            let generated = format!("{source}_{category}");
            let indicator = strip_float_artifact(&generated);
            register_name(&mut names, indicator.clone(), &generated)?;
            let values: Vec<bool> = labels
                .iter()
                .map(|label| label.as_deref() == Some(category.as_str()))
                .collect();
            output.push(Series::new(indicator.as_str().into(), values).into_column());
            report.indicators.push(indicator);
        }

        if encode_nulls && labels.iter().any(Option::is_none) {
            let generated = format!("{source}_{NULL_SUFFIX}");
            let indicator = strip_float_artifact(&generated);
            register_name(&mut names, indicator.clone(), &generated)?;
            let values: Vec<bool> = labels.iter().map(Option::is_none).collect();
            output.push(Series::new(indicator.as_str().into(), values).into_column());
            report.indicators.push(indicator);
        }

        tracing::debug!(column = %source, categories = categories.len(), "column encoded");
        report.encoded.push(source.clone());
    }

    let encoded = DataFrame::new(output)?;
    Ok((encoded, report))
}

fn register_name(names: &mut HashMap<String, String>, name: String, source: &str) -> Result<()> {
    if let Some(first) = names.get(&name) {
        return Err(TransformError::NamingCollision {
            name,
            first: first.clone(),
            second: source.to_string(),
        });
    }
    names.insert(name, source.to_string());
    Ok(())
}

fn distinct_sorted(labels: &[Option<String>]) -> Vec<String> {
    let mut distinct: Vec<String> = labels
        .iter()
        .flatten()
        .cloned()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    distinct.sort_by(|a, b| compare_labels(a, b));
    distinct
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (parse_f64(a), parse_f64(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Category code as written in the catalog: integral numbers without a
/// fractional part.
fn catalog_code(label: &str) -> String {
    match parse_f64(label) {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        _ => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsmo_model::VariableKind;

    fn classification(categorical: &[(&str, &str)]) -> VariableClassification {
        let mut builder = VariableClassification::builder();
        for (column, code) in categorical {
            builder.push(column, code, VariableKind::Categorical);
        }
        builder.finish()
    }

    fn bools(df: &DataFrame, name: &str) -> Vec<Option<bool>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .bool()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn float_codes_lose_artifact() {
        let df = df!(
            "x_gender" => [Some(1.0), Some(2.0), None, Some(1.0)],
            "pmms" => [3.5, 3.6, 3.7, 3.8],
        )
        .unwrap();
        let (out, report) = encode_categoricals(
            &df,
            &classification(&[("x_gender", "GENDERFM")]),
            &CategoryCatalog::new(),
            false,
        )
        .unwrap();

        assert_eq!(
            out.get_column_names_str(),
            vec!["pmms", "x_gender_1", "x_gender_2"]
        );
        assert_eq!(
            bools(&out, "x_gender_1"),
            vec![Some(true), Some(false), Some(false), Some(true)]
        );
        assert_eq!(report.encoded, vec!["x_gender"]);
    }

    #[test]
    fn numeric_labels_sort_numerically() {
        let df = df!("x_size" => [10i64, 2, 1]).unwrap();
        let (out, _) = encode_categoricals(
            &df,
            &classification(&[("x_size", "SIZEFM")]),
            &CategoryCatalog::new(),
            false,
        )
        .unwrap();
        assert_eq!(
            out.get_column_names_str(),
            vec!["x_size_1", "x_size_2", "x_size_10"]
        );
    }

    #[test]
    fn null_indicator_when_requested() {
        let df = df!("x_gender" => [Some(1i64), None]).unwrap();
        let (out, report) = encode_categoricals(
            &df,
            &classification(&[("x_gender", "GENDERFM")]),
            &CategoryCatalog::new(),
            true,
        )
        .unwrap();

        assert_eq!(report.indicators, vec!["x_gender_1", "x_gender_nan"]);
        assert_eq!(bools(&out, "x_gender_nan"), vec![Some(false), Some(true)]);
    }

    #[test]
    fn stripped_names_that_collide_are_fatal() {
        let df = df!("x_code" => ["1.0", "1"]).unwrap();
        let err = encode_categoricals(
            &df,
            &classification(&[("x_code", "CODEFM")]),
            &CategoryCatalog::new(),
            false,
        )
        .unwrap_err();
        match err {
            TransformError::NamingCollision { name, .. } => assert_eq!(name, "x_code_1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn collision_with_passthrough_column_is_fatal() {
        let df = df!("x_a" => [1i64], "x_a_1" => [0.5]).unwrap();
        let err = encode_categoricals(
            &df,
            &classification(&[("x_a", "AFM")]),
            &CategoryCatalog::new(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::NamingCollision { .. }));
    }

    #[test]
    fn unknown_catalog_values_are_counted() {
        let mut catalog = CategoryCatalog::new();
        catalog.insert("GENDERFM", [("1", "Male"), ("2", "Female")]);
        let df = df!("x_gender" => [1.0, 2.0, 9.0]).unwrap();
        let (_, report) = encode_categoricals(
            &df,
            &classification(&[("x_gender", "GENDERFM")]),
            &catalog,
            false,
        )
        .unwrap();
        assert_eq!(report.unknown_values.get("x_gender"), Some(&1));
    }

    #[test]
    fn strip_repeats_until_clean() {
        assert_eq!(strip_float_artifact("a_1..00"), "a_1");
        assert_eq!(strip_float_artifact("a_b"), "a_b");
    }
}
