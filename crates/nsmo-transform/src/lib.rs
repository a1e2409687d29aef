//! Preparation stages for the NSMO mortgage survey.
//!
//! Every stage is a function from immutable inputs to a new table:
//!
//! - **classify**: categorical/numeric split of the survey columns from format metadata
//! - **normalization**: sentinel missing values (negative codes, `.`) to null
//! - **temporal**: daily yield observations to monthly means
//! - **join**: left join of the monthly means onto the survey by year/month
//! - **derive**: the `Beta` ratio and its winsorized copy
//! - **encode**: one-hot encoding of categorical columns
//! - **emit**: the classification as handed to downstream consumers
//!
//! [`run_pipeline`] chains them in order.

pub mod classify;
pub mod derive;
pub mod emit;
pub mod encode;
pub mod error;
pub mod join;
pub mod normalization;
pub mod pipeline;
pub mod temporal;

pub use classify::classify_variables;
pub use derive::{
    BETA, BETA_WINSORIZED, BetaSummary, WinsorBounds, add_beta_columns, derive_beta,
    quantile_linear, winsorize_values,
};
pub use emit::emit_variables;
pub use encode::{EncodingReport, encode_categoricals, strip_float_artifact};
pub use error::{Result, TransformError};
pub use join::join_monthly_yields;
pub use normalization::{MISSING_PLACEHOLDER, SentinelReport, normalize_sentinels};
pub use pipeline::{PreparedData, RunSummary, run_pipeline};
pub use temporal::{
    MonthlyYield, MonthlyYields, OBSERVATION_MONTH, OBSERVATION_YEAR, aggregate_monthly,
};
