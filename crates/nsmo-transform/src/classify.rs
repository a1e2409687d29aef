//! Categorical/numeric classification from format metadata.

use nsmo_model::{
    ClassificationIssue, FormatMap, FormatPartition, IssueReason, VariableClassification,
};

/// Classify `columns` against the format map and partition.
///
/// Columns keep their input order within each list. A column without a
/// format code, or whose code belongs to neither partition, is logged and
/// recorded as an issue; it appears in neither list.
pub fn classify_variables<'a, I>(
    columns: I,
    formats: &FormatMap,
    partition: &FormatPartition,
) -> VariableClassification
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = VariableClassification::builder();

    for column in columns {
        let Some(format_code) = formats.get(column) else {
            tracing::error!(column = %column, "no format code, column left unclassified");
            builder.push_issue(ClassificationIssue {
                column: column.to_string(),
                format_code: None,
                reason: IssueReason::MissingFormat,
            });
            continue;
        };

        match partition.kind_of(format_code) {
            Some(kind) => builder.push(column, format_code, kind),
            None => {
                tracing::error!(
                    column = %column,
                    format_code = %format_code,
                    "format is neither categorical nor numeric, column left unclassified"
                );
                builder.push_issue(ClassificationIssue {
                    column: column.to_string(),
                    format_code: Some(format_code.to_string()),
                    reason: IssueReason::UnknownFormat,
                });
            }
        }
    }

    builder.finish()
}
