//! Error types for flatdiff.

use thiserror::Error;

/// Result type alias for flatdiff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, flattening or comparing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON decoding error.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document for one side of a pair could not be found.
    #[error("Document not found: {0}")]
    MissingDocument(String),

    /// An input list or the run configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The database could not be reached or queried.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// A document query failed while the connection stayed usable.
    #[error("Database query error: {0}")]
    Query(String),

    /// CSV read or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file syntax error.
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if the error only affects the pair being compared.
    ///
    /// Pair-local failures are logged and the run moves on to the next pair;
    /// everything else aborts the run.
    pub fn is_pair_local(&self) -> bool {
        matches!(
            self,
            Error::Parse(_)
                | Error::Xml(_)
                | Error::Json(_)
                | Error::MissingDocument(_)
                | Error::Query(_)
        )
    }
}
