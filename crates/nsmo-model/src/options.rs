//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Column names of the survey table used by the join and the Beta derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageColumns {
    pub open_year: String,
    pub open_month: String,
    pub pmms: String,
    pub rate_spread: String,
}

impl Default for MortgageColumns {
    fn default() -> Self {
        Self {
            open_year: "open_year".to_string(),
            open_month: "open_month".to_string(),
            pmms: "pmms".to_string(),
            rate_spread: "rate_spread".to_string(),
        }
    }
}

/// Column names and date format of the daily yield series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldColumns {
    pub date: String,
    pub rate: String,
    /// `chrono` format string for the date column.
    pub date_format: String,
}

impl Default for YieldColumns {
    fn default() -> Self {
        Self {
            date: "observation_date".to_string(),
            rate: "DGS30".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Two-sided winsorization limits, as fractions of the finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinsorLimits {
    pub lower: f64,
    pub upper: f64,
}

impl WinsorLimits {
    pub fn new(lower: f64, upper: f64) -> Result<Self, MetadataError> {
        let limits = Self { lower, upper };
        limits.validate()?;
        Ok(limits)
    }

    /// Each limit must lie in `[0, 0.5)` and together they must leave some
    /// values unclipped.
    pub fn validate(&self) -> Result<(), MetadataError> {
        let in_range = |v: f64| (0.0..0.5).contains(&v);
        if in_range(self.lower) && in_range(self.upper) && self.lower + self.upper < 1.0 {
            Ok(())
        } else {
            Err(MetadataError::InvalidLimits {
                lower: self.lower,
                upper: self.upper,
            })
        }
    }
}

impl Default for WinsorLimits {
    fn default() -> Self {
        Self {
            lower: 0.05,
            upper: 0.05,
        }
    }
}

/// Options for a full preparation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub mortgage: MortgageColumns,
    pub yields: YieldColumns,
    pub winsor: WinsorLimits,
    /// Emit a `{column}_nan` indicator for null categories.
    pub encode_nulls: bool,
    /// Treat unclassified columns as a fatal error.
    pub strict_classification: bool,
}
