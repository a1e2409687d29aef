//! The three external metadata dictionaries.
//!
//! The survey ships its variable metadata as SAS format definitions. They are
//! modelled here as three independent structures:
//!
//! - [`FormatMap`]: every raw column name mapped to its format code
//! - [`CategoryCatalog`]: categorical format codes with their known category values
//! - [`ExclusionSet`]: column names or format codes exempt from sentinel normalization
//!
//! A [`FormatPartition`] splits the known format codes into categorical and
//! numeric codes; the classifier works against it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::classification::VariableKind;
use crate::error::MetadataError;

/// Column name to format code mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatMap {
    formats: BTreeMap<String, String>,
}

impl FormatMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, format_code: impl Into<String>) {
        self.formats.insert(column.into(), format_code.into());
    }

    /// Format code registered for a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.formats.get(column).map(String::as_str)
    }

    /// Every distinct format code in the map.
    pub fn codes(&self) -> BTreeSet<&str> {
        self.formats.values().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.formats.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Columns from `columns` that have no format code, in input order.
    pub fn missing_columns<'a, I>(&self, columns: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        columns
            .into_iter()
            .filter(|column| !self.formats.contains_key(*column))
            .map(str::to_string)
            .collect()
    }

    /// Fails when any of `columns` has no format code.
    pub fn require_columns<'a, I>(&self, columns: I) -> Result<(), MetadataError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let missing = self.missing_columns(columns);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MetadataError::MissingFormats { columns: missing })
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormatMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            formats: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Categorical format codes and the category values each one defines.
///
/// Keys of the inner map are category codes as written in the format
/// definition (`"1"`, `"2"`, ...); values are their labels. Null categories
/// are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCatalog {
    formats: BTreeMap<String, BTreeMap<String, String>>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a categorical format with its categories.
    pub fn insert<I, K, V>(&mut self, format_code: impl Into<String>, categories: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.formats.insert(
            format_code.into(),
            categories
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
    }

    pub fn format_codes(&self) -> BTreeSet<&str> {
        self.formats.keys().map(String::as_str).collect()
    }

    pub fn contains_format(&self, format_code: &str) -> bool {
        self.formats.contains_key(format_code)
    }

    pub fn categories(&self, format_code: &str) -> Option<&BTreeMap<String, String>> {
        self.formats.get(format_code)
    }

    /// Whether `value` is a listed category code of `format_code`.
    pub fn is_known_value(&self, format_code: &str, value: &str) -> bool {
        self.formats
            .get(format_code)
            .is_some_and(|categories| categories.contains_key(value))
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Column names or format codes left untouched by sentinel normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// Exclusions used by the survey: the loan status flag format and the
    /// rate spread, both of which carry legitimate negative values.
    pub fn survey_default() -> Self {
        ["PSTATFM", "rate_spread"].into_iter().collect()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// A column is excluded when its name or its format code is listed.
    pub fn excludes(&self, column: &str, format_code: Option<&str>) -> bool {
        self.names.contains(column) || format_code.is_some_and(|code| self.names.contains(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Disjoint split of format codes into categorical and numeric codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatPartition {
    categorical: BTreeSet<String>,
    numeric: BTreeSet<String>,
}

impl FormatPartition {
    /// Build a partition from explicit code sets.
    pub fn new<C, N>(categorical: C, numeric: N) -> Result<Self, MetadataError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        let categorical: BTreeSet<String> = categorical.into_iter().map(Into::into).collect();
        let numeric: BTreeSet<String> = numeric.into_iter().map(Into::into).collect();
        if let Some(code) = categorical.intersection(&numeric).next() {
            return Err(MetadataError::OverlappingPartition { code: code.clone() });
        }
        Ok(Self {
            categorical,
            numeric,
        })
    }

    /// Categorical codes are the catalog's keys; numeric codes are every other
    /// code used by the format map.
    pub fn derive(formats: &FormatMap, catalog: &CategoryCatalog) -> Self {
        let categorical: BTreeSet<String> = catalog
            .format_codes()
            .into_iter()
            .map(str::to_string)
            .collect();
        let numeric = formats
            .codes()
            .into_iter()
            .filter(|code| !categorical.contains(*code))
            .map(str::to_string)
            .collect();
        Self {
            categorical,
            numeric,
        }
    }

    pub fn kind_of(&self, format_code: &str) -> Option<VariableKind> {
        if self.categorical.contains(format_code) {
            Some(VariableKind::Categorical)
        } else if self.numeric.contains(format_code) {
            Some(VariableKind::Numeric)
        } else {
            None
        }
    }

    pub fn categorical(&self) -> &BTreeSet<String> {
        &self.categorical
    }

    pub fn numeric(&self) -> &BTreeSet<String> {
        &self.numeric
    }
}

/// The three dictionaries as loaded together.
#[derive(Debug, Clone, Default)]
pub struct MetadataBundle {
    pub formats: FormatMap,
    pub catalog: CategoryCatalog,
    pub exclusions: ExclusionSet,
}

impl MetadataBundle {
    pub fn partition(&self) -> FormatPartition {
        FormatPartition::derive(&self.formats, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> FormatMap {
        [
            ("x_gender", "GENDERFM"),
            ("x_income", "INCOMEFM"),
            ("pmms", "NUMFM"),
            ("rate_spread", "NUMFM"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn partition_splits_codes() {
        let mut catalog = CategoryCatalog::new();
        catalog.insert("GENDERFM", [("1", "Male"), ("2", "Female")]);
        catalog.insert("INCOMEFM", [("1", "Low")]);
        let partition = FormatPartition::derive(&formats(), &catalog);

        assert_eq!(partition.kind_of("GENDERFM"), Some(VariableKind::Categorical));
        assert_eq!(partition.kind_of("NUMFM"), Some(VariableKind::Numeric));
        assert_eq!(partition.kind_of("OTHER"), None);
        assert!(partition.categorical().is_disjoint(partition.numeric()));
    }

    #[test]
    fn explicit_partition_rejects_overlap() {
        let err = FormatPartition::new(["A", "B"], ["B", "C"]).unwrap_err();
        assert!(matches!(err, MetadataError::OverlappingPartition { code } if code == "B"));
    }

    #[test]
    fn require_columns_lists_missing_in_order() {
        let err = formats()
            .require_columns(["pmms", "zeta", "alpha"])
            .unwrap_err();
        match err {
            MetadataError::MissingFormats { columns } => {
                assert_eq!(columns, vec!["zeta".to_string(), "alpha".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exclusions_match_name_or_format() {
        let exclusions = ExclusionSet::survey_default();
        assert!(exclusions.excludes("rate_spread", Some("NUMFM")));
        assert!(exclusions.excludes("x_status", Some("PSTATFM")));
        assert!(!exclusions.excludes("pmms", Some("NUMFM")));
        assert!(!exclusions.excludes("pmms", None));
    }

    #[test]
    fn catalog_known_values() {
        let mut catalog = CategoryCatalog::new();
        catalog.insert("GENDERFM", [("1", "Male")]);
        assert!(catalog.is_known_value("GENDERFM", "1"));
        assert!(!catalog.is_known_value("GENDERFM", "3"));
        assert!(!catalog.is_known_value("NOPE", "1"));
    }
}
