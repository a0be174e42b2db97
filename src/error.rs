//! Error types for sqlmask

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while masking or unmasking SQL
#[derive(Error, Debug)]
pub enum SqlMaskError {
    #[error("Failed to read SQL file: {path}")]
    SqlFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read mapping file: {path}")]
    MappingRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed mapping file: {path}")]
    MalformedMapping {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Mapping assigns placeholder '{placeholder}' to more than one identifier")]
    DuplicatePlaceholder { placeholder: String },

    #[error("Failed to write mapping file: {path}")]
    MappingWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Column '{column}' not found in CSV. Available columns: {available}")]
    ColumnNotFound { column: String, available: String },

    #[error("Input CSV file has no headers: {path}")]
    MissingHeaders { path: PathBuf },
}
