//! Tests for metadata directory loading.

use std::fs;

use nsmo_ingest::{
    CATEGORY_CATALOG_FILE, EXCLUSIONS_FILE, IngestError, VARIABLE_FORMATS_FILE,
    check_primary_columns, load_metadata, load_pipeline_options,
};
use nsmo_model::{ExclusionSet, MetadataError, VariableKind};
use polars::prelude::*;
use tempfile::TempDir;

fn write_metadata(dir: &TempDir, with_exclusions: bool) {
    fs::write(
        dir.path().join(VARIABLE_FORMATS_FILE),
        r#"
[formats]
open_year = "YEARFM"
open_month = "MONTHFM"
pmms = "PMMSFM"
rate_spread = "SPREADFM"
x_gender = "GENDERFM"
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(CATEGORY_CATALOG_FILE),
        r#"
[GENDERFM]
1 = "Male"
2 = "Female"
"#,
    )
    .unwrap();
    if with_exclusions {
        fs::write(
            dir.path().join(EXCLUSIONS_FILE),
            r#"names = ["SPREADFM"]"#,
        )
        .unwrap();
    }
}

#[test]
fn loads_all_three_files() {
    let dir = TempDir::new().unwrap();
    write_metadata(&dir, true);

    let bundle = load_metadata(dir.path()).unwrap();

    assert_eq!(bundle.formats.get("x_gender"), Some("GENDERFM"));
    assert!(bundle.catalog.is_known_value("GENDERFM", "2"));
    assert!(bundle.exclusions.excludes("rate_spread", Some("SPREADFM")));
    assert!(!bundle.exclusions.excludes("x_status", Some("PSTATFM")));

    let partition = bundle.partition();
    assert_eq!(partition.kind_of("GENDERFM"), Some(VariableKind::Categorical));
    assert_eq!(partition.kind_of("PMMSFM"), Some(VariableKind::Numeric));
}

#[test]
fn missing_exclusions_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    write_metadata(&dir, false);

    let bundle = load_metadata(dir.path()).unwrap();
    assert_eq!(bundle.exclusions, ExclusionSet::survey_default());
}

#[test]
fn missing_formats_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_metadata(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn malformed_toml_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(VARIABLE_FORMATS_FILE), "[formats\n").unwrap();
    let err = load_metadata(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::Toml { .. }));
}

#[test]
fn primary_columns_must_have_formats() {
    let dir = TempDir::new().unwrap();
    write_metadata(&dir, true);
    let bundle = load_metadata(dir.path()).unwrap();

    let df = df!(
        "pmms" => [3.5],
        "x_new" => [1],
    )
    .unwrap();

    let err = check_primary_columns(&bundle.formats, &df).unwrap_err();
    match err {
        IngestError::Metadata(MetadataError::MissingFormats { columns }) => {
            assert_eq!(columns, vec!["x_new".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn pipeline_options_keep_defaults_for_missing_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nsmo.toml");
    fs::write(
        &path,
        r#"
strict_classification = true

[winsor]
lower = 0.01
upper = 0.1
"#,
    )
    .unwrap();

    let options = load_pipeline_options(&path).unwrap();
    assert!(options.strict_classification);
    assert!(!options.encode_nulls);
    assert_eq!(options.winsor.upper, 0.1);
    assert_eq!(options.yields.rate, "DGS30");
}

#[test]
fn pipeline_options_reject_bad_limits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nsmo.toml");
    fs::write(&path, "[winsor]\nlower = 0.7\nupper = 0.1\n").unwrap();

    let err = load_pipeline_options(&path).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Metadata(MetadataError::InvalidLimits { .. })
    ));
}
