//! Output generation for prepared survey data.
//!
//! - **CSV**: the encoded, joined and derived table with a header row
//! - **JSON**: the emitted variable classification (`categorical_variables`,
//!   `numeric_variables`)

mod common;
mod csv;
mod variables;

pub use common::ensure_parent_dir;
pub use csv::write_csv_table;
pub use variables::{read_variables_json, write_variables_json};
