// src/error.rs

//! Error types for the component catalog
//!
//! Only ingestion and configuration return errors. The merge pipeline itself
//! never fails: rejected adds and dangling merge components are logged and
//! the call becomes a no-op.

use crate::parser::ParseError;
use thiserror::Error;

/// Errors that can occur while loading or configuring the catalog
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error with context
    #[error("I/O error: {0}")]
    IoError(String),

    /// Raw I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be turned into components
    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: ParseError,
    },

    /// Parse error without a file context (in-memory sources)
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration file or value is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A unique ID string does not have six segments
    #[error("Invalid unique ID: {0}")]
    InvalidUniqueId(String),

    /// The caller cancelled a bulk load
    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;
