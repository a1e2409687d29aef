//! Data model for NSMO mortgage data preparation.
//!
//! - **metadata**: the three external dictionaries (format map, category catalog, exclusions)
//! - **classification**: categorical/numeric split of the survey columns
//! - **options**: typed pipeline configuration
//! - **variables**: the classification as persisted for downstream consumers

pub mod classification;
pub mod error;
pub mod metadata;
pub mod options;
pub mod variables;

pub use classification::{
    ClassificationBuilder, ClassificationIssue, IssueReason, VariableClassification, VariableKind,
};
pub use error::MetadataError;
pub use metadata::{CategoryCatalog, ExclusionSet, FormatMap, FormatPartition, MetadataBundle};
pub use options::{MortgageColumns, PipelineOptions, WinsorLimits, YieldColumns};
pub use variables::CleanedVariables;
