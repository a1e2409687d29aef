//! Variable classification as handed to downstream consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Classified variables keyed by name, each mapped to its format code.
///
/// Unclassified columns never appear here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedVariables {
    pub categorical_variables: BTreeMap<String, String>,
    pub numeric_variables: BTreeMap<String, String>,
}

impl CleanedVariables {
    pub fn len(&self) -> usize {
        self.categorical_variables.len() + self.numeric_variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categorical_variables.is_empty() && self.numeric_variables.is_empty()
    }
}
