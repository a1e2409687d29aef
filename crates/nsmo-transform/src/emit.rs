//! Classification handed to downstream consumers.

use std::collections::BTreeMap;

use nsmo_model::{CleanedVariables, VariableClassification, VariableKind};

/// Both variable lists keyed by name with their format codes.
///
/// Unclassified columns are not part of either mapping.
pub fn emit_variables(classification: &VariableClassification) -> CleanedVariables {
    let collect = |kind: VariableKind| -> BTreeMap<String, String> {
        classification
            .with_formats(kind)
            .map(|(column, code)| (column.to_string(), code.to_string()))
            .collect()
    };
    CleanedVariables {
        categorical_variables: collect(VariableKind::Categorical),
        numeric_variables: collect(VariableKind::Numeric),
    }
}
