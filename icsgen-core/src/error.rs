//! Error types for icsgen.
//!
//! Encoding itself never fails; these cover configuration, input loading
//! and writing finished documents to disk.

use thiserror::Error;

/// Errors that can occur outside the encoder.
#[derive(Error, Debug)]
pub enum IcsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for icsgen operations.
pub type IcsResult<T> = Result<T, IcsError>;
