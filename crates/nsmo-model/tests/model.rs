//! Serialization tests for model types.

use nsmo_model::{CategoryCatalog, CleanedVariables, ExclusionSet, FormatMap};

#[test]
fn cleaned_variables_serialize_with_sorted_keys() {
    let mut variables = CleanedVariables::default();
    variables
        .categorical_variables
        .insert("x_zeta".to_string(), "ZFM".to_string());
    variables
        .categorical_variables
        .insert("x_alpha".to_string(), "AFM".to_string());
    variables
        .numeric_variables
        .insert("pmms".to_string(), "NUMFM".to_string());

    let json = serde_json::to_string(&variables).expect("serialize variables");
    assert_eq!(
        json,
        r#"{"categorical_variables":{"x_alpha":"AFM","x_zeta":"ZFM"},"numeric_variables":{"pmms":"NUMFM"}}"#
    );
    let round: CleanedVariables = serde_json::from_str(&json).expect("deserialize variables");
    assert_eq!(round, variables);
    assert_eq!(round.len(), 3);
}

#[test]
fn format_map_deserializes_from_plain_table() {
    let formats: FormatMap = serde_json::from_str(r#"{"pmms":"NUMFM","x_gender":"GENDERFM"}"#)
        .expect("deserialize formats");
    assert_eq!(formats.get("x_gender"), Some("GENDERFM"));
    assert_eq!(formats.codes().len(), 2);
}

#[test]
fn catalog_and_exclusions_deserialize() {
    let catalog: CategoryCatalog =
        serde_json::from_str(r#"{"GENDERFM":{"1":"Male","2":"Female"}}"#).expect("catalog");
    assert!(catalog.is_known_value("GENDERFM", "2"));

    let exclusions: ExclusionSet =
        serde_json::from_str(r#"["PSTATFM","rate_spread"]"#).expect("exclusions");
    assert_eq!(exclusions, ExclusionSet::survey_default());
}
