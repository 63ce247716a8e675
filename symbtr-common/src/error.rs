//! Common error types for the SymbTr tools

use thiserror::Error;

/// Common result type for SymbTr operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the SymbTr crates
#[derive(Error, Debug)]
pub enum Error {
    /// Score name has fewer than the five `--` separated fields
    #[error("Malformed score identifier '{name}': expected at least 5 '--' separated parts, found {parts}")]
    MalformedIdentifier { name: String, parts: usize },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
