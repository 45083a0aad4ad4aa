//! Error types for registry and filing operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for registry and filing operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading the registry or fetching filings.
#[derive(Debug, Error)]
pub enum DataError {
    /// Required local cache file is missing
    #[error("Cache file not found: {}", .path.display())]
    CacheNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// EDINET returned a non-success HTTP status
    #[error("EDINET API error for document {doc_id}: HTTP {status}: {body}")]
    EdinetApi {
        /// Document that was requested
        doc_id: String,
        /// HTTP status code of the response
        status: reqwest::StatusCode,
        /// Response body, verbatim
        body: String,
    },

    /// Corporate number absent from the loaded document index
    #[error("Corporate number not found in the document index: {0}")]
    UnknownCorporation(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// ZIP archive error
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Archive entry is not valid UTF-16 text
    #[error("Undecodable UTF-16 text in archive entry: {entry}")]
    Decode {
        /// Name of the archive entry
        entry: String,
    },

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),
}
