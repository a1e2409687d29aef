//! Normalization of raw survey values.
//!
//! - **sentinel**: collapse negative codes and `.` placeholders into nulls

pub mod sentinel;

pub use sentinel::{MISSING_PLACEHOLDER, SentinelReport, normalize_sentinels};
