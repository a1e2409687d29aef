use nsmo_model::CleanedVariables;
use nsmo_output::{read_variables_json, write_variables_json};

fn variables() -> CleanedVariables {
    let mut variables = CleanedVariables::default();
    variables
        .categorical_variables
        .insert("x_race".to_string(), "RACEFM".to_string());
    variables
        .categorical_variables
        .insert("x_gender".to_string(), "GENDERFM".to_string());
    variables
        .numeric_variables
        .insert("pmms".to_string(), "NUMFM".to_string());
    variables
}

#[test]
fn json_has_two_sorted_mappings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned_variables.json");

    write_variables_json(&path, &variables()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        r#"{
  "categorical_variables": {
    "x_gender": "GENDERFM",
    "x_race": "RACEFM"
  },
  "numeric_variables": {
    "pmms": "NUMFM"
  }
}
"#
    );
}

#[test]
fn json_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("vars.json");

    write_variables_json(&path, &variables()).unwrap();

    assert_eq!(read_variables_json(&path).unwrap(), variables());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = read_variables_json(&path).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}
