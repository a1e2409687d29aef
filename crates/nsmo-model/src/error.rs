use thiserror::Error;

/// Errors raised while assembling or checking the metadata dictionaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataError {
    /// Dataset columns without an entry in the format map.
    #[error("no format code for {} column(s): {}", .columns.len(), .columns.join(", "))]
    MissingFormats { columns: Vec<String> },

    /// A format code was placed in both partitions.
    #[error("format code '{code}' is both categorical and numeric")]
    OverlappingPartition { code: String },

    /// Winsorization limits outside `[0, 0.5)` or summing to one or more.
    #[error("invalid winsorization limits ({lower}, {upper})")]
    InvalidLimits { lower: f64, upper: f64 },
}
