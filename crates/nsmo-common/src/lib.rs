//! Shared utilities for the NSMO preparation crates.
//!
//! Helpers for pulling typed values out of Polars frames and for rendering
//! cell values as category labels.

mod frame;

pub use frame::{
    any_to_f64, category_label, format_float_label, numeric_column_f64, parse_f64,
};
