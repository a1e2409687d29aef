//! Ingestion for NSMO mortgage data preparation.
//!
//! Loads the survey table and the daily yield series from CSV into Polars
//! DataFrames, and the three metadata dictionaries from TOML.
//!
//! # Example
//!
//! ```ignore
//! use nsmo_ingest::{check_primary_columns, load_metadata, read_csv_table};
//!
//! let survey = read_csv_table(Path::new("bin/nsmo_v50_1321_puf.csv"))?;
//! let metadata = load_metadata(Path::new("."))?;
//! check_primary_columns(&metadata.formats, &survey)?;
//! ```

mod csv;
mod error;
mod metadata;

pub use csv::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_table,
    validate_dataframe_shape,
};
pub use error::{IngestError, Result};
pub use metadata::{
    CATEGORY_CATALOG_FILE, EXCLUSIONS_FILE, VARIABLE_FORMATS_FILE, check_primary_columns,
    load_category_catalog, load_exclusions, load_format_map, load_metadata,
    load_pipeline_options,
};
