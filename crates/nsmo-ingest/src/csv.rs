//! CSV file reading into Polars DataFrames.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (1 GB default).
pub const MAX_CSV_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::read(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Validate DataFrame shape after loading.
///
/// Rejects tables without rows and blank column names.
pub fn validate_dataframe_shape(df: &DataFrame, path: &Path) -> Result<()> {
    if df.height() == 0 {
        return Err(IngestError::EmptyDataFrame {
            path: path.to_path_buf(),
        });
    }

    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(())
}

/// Reads a CSV file with a single header row into a DataFrame.
///
/// The whole file is scanned for schema inference: survey files carry `.`
/// placeholders far down otherwise numeric columns, and a partial scan would
/// type those columns as numbers and then fail on the placeholder.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_dataframe_shape(&df, path)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded CSV table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_table() {
        let file = create_temp_csv("A,B,C\n1,2,3\n4,5,6\n");
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_dot_placeholder_keeps_column_as_text() {
        let file = create_temp_csv("A,B\n1,2\n.,3\n");
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.column("A").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("B").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_header_only_is_rejected() {
        let file = create_temp_csv("A,B,C\n");
        let result = read_csv_table(file.path());

        assert!(matches!(
            result,
            Err(IngestError::EmptyDataFrame { .. }) | Err(IngestError::CsvParse { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_table(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_file_size_limit() {
        let file = create_temp_csv("A\n1\n");
        let result = check_file_size_with_limit(file.path(), 2);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
        assert!(check_file_size_with_limit(file.path(), 1024).is_ok());
    }
}
