//! Categorical/numeric classification of survey columns.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind assigned to a classified column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Categorical,
    Numeric,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Categorical => f.write_str("categorical"),
            Self::Numeric => f.write_str("numeric"),
        }
    }
}

/// Why a column could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueReason {
    /// The column has no entry in the format map.
    MissingFormat,
    /// The column's format code is in neither partition.
    UnknownFormat,
}

/// A column left out of both variable lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationIssue {
    pub column: String,
    pub format_code: Option<String>,
    pub reason: IssueReason,
}

impl fmt::Display for ClassificationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.reason, &self.format_code) {
            (IssueReason::MissingFormat, _) | (_, None) => {
                write!(f, "column '{}' has no format code", self.column)
            }
            (IssueReason::UnknownFormat, Some(code)) => write!(
                f,
                "column '{}' has format '{}' which is neither categorical nor numeric",
                self.column, code
            ),
        }
    }
}

/// Result of classifying the columns of the survey table.
///
/// Both lists keep the order in which columns appear in the table. The value
/// is built once through [`ClassificationBuilder`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableClassification {
    categorical: Vec<String>,
    numeric: Vec<String>,
    formats: BTreeMap<String, String>,
    issues: Vec<ClassificationIssue>,
}

impl VariableClassification {
    pub fn builder() -> ClassificationBuilder {
        ClassificationBuilder::default()
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    pub fn numeric(&self) -> &[String] {
        &self.numeric
    }

    pub fn issues(&self) -> &[ClassificationIssue] {
        &self.issues
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Format code of a classified column.
    pub fn format_code(&self, column: &str) -> Option<&str> {
        self.formats.get(column).map(String::as_str)
    }

    pub fn kind_of(&self, column: &str) -> Option<VariableKind> {
        if self.categorical.iter().any(|c| c == column) {
            Some(VariableKind::Categorical)
        } else if self.numeric.iter().any(|c| c == column) {
            Some(VariableKind::Numeric)
        } else {
            None
        }
    }

    /// Classified columns of one kind paired with their format codes.
    pub fn with_formats(&self, kind: VariableKind) -> impl Iterator<Item = (&str, &str)> {
        let columns = match kind {
            VariableKind::Categorical => &self.categorical,
            VariableKind::Numeric => &self.numeric,
        };
        columns.iter().filter_map(|column| {
            self.formats
                .get(column)
                .map(|code| (column.as_str(), code.as_str()))
        })
    }
}

/// Accumulates classification results column by column.
#[derive(Debug, Default)]
pub struct ClassificationBuilder {
    inner: VariableClassification,
}

impl ClassificationBuilder {
    pub fn push(&mut self, column: &str, format_code: &str, kind: VariableKind) {
        match kind {
            VariableKind::Categorical => self.inner.categorical.push(column.to_string()),
            VariableKind::Numeric => self.inner.numeric.push(column.to_string()),
        }
        self.inner
            .formats
            .insert(column.to_string(), format_code.to_string());
    }

    pub fn push_issue(&mut self, issue: ClassificationIssue) {
        self.inner.issues.push(issue);
    }

    pub fn finish(self) -> VariableClassification {
        self.inner
    }
}
