//! Unified error type for folio operations.
use thiserror::Error;

/// Main error type for folio operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input value
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Argument outside the accepted range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Part or node not found
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// XML generation error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// Remote resource could not be fetched
    #[error("Network error: {0}")]
    Network(String),

    /// Feature disabled at compile time
    #[error("Feature '{0}' is disabled. Enable it with --features {0}")]
    FeatureDisabled(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;
