//! Overview of the format codes in a metadata directory.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

use nsmo_model::{MetadataBundle, VariableKind};

/// One format code with its kind and usage counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRow {
    pub code: String,
    pub kind: Option<VariableKind>,
    /// Columns of the format map carrying this code.
    pub columns: usize,
    /// Catalog entries, for categorical codes only.
    pub categories: Option<usize>,
}

/// Rows for every code the format map uses, in code order.
pub fn format_rows(metadata: &MetadataBundle) -> Vec<FormatRow> {
    let partition = metadata.partition();
    metadata
        .formats
        .codes()
        .into_iter()
        .map(|code| {
            let kind = partition.kind_of(code);
            let columns = metadata
                .formats
                .iter()
                .filter(|(_, format)| *format == code)
                .count();
            let categories = match kind {
                Some(VariableKind::Categorical) => Some(
                    metadata
                        .catalog
                        .categories(code)
                        .map_or(0, |categories| categories.len()),
                ),
                _ => None,
            };
            FormatRow {
                code: code.to_string(),
                kind,
                columns,
                categories,
            }
        })
        .collect()
}

pub fn formats_table(rows: &[FormatRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Format", "Kind", "Columns", "Categories"]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
    for row in rows {
        table.add_row(vec![
            row.code.clone(),
            dash_or(row.kind),
            row.columns.to_string(),
            dash_or(row.categories),
        ]);
    }
    table
}

fn dash_or<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsmo_model::{CategoryCatalog, ExclusionSet};

    fn metadata() -> MetadataBundle {
        let mut catalog = CategoryCatalog::new();
        catalog.insert("GENDERFM", [("1", "Male"), ("2", "Female")]);
        catalog.insert("RACEFM", [("1", "White")]);
        MetadataBundle {
            formats: [
                ("x_gender", "GENDERFM"),
                ("pmms", "NUMFM"),
                ("rate_spread", "NUMFM"),
                ("x_race", "RACEFM"),
            ]
            .into_iter()
            .collect(),
            catalog,
            exclusions: ExclusionSet::survey_default(),
        }
    }

    #[test]
    fn rows_follow_code_order() {
        let rows = format_rows(&metadata());
        let lines: Vec<String> = rows
            .iter()
            .map(|row| {
                format!(
                    "{} {} {} {}",
                    row.code,
                    dash_or(row.kind),
                    row.columns,
                    dash_or(row.categories)
                )
            })
            .collect();
        insta::assert_snapshot!(lines.join("\n"), @r"
        GENDERFM categorical 1 2
        NUMFM numeric 2 -
        RACEFM categorical 1 1
        ");
    }

    #[test]
    fn table_has_one_row_per_code() {
        let rows = format_rows(&metadata());
        let table = formats_table(&rows);
        assert_eq!(table.row_count(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("Categories"));
        assert!(rendered.contains("NUMFM"));
    }

    #[test]
    fn empty_metadata_gives_no_rows() {
        assert!(format_rows(&MetadataBundle::default()).is_empty());
    }
}
