//! CLI library components for NSMO mortgage data preparation.

pub mod formats;
pub mod logging;
pub mod pipeline;
