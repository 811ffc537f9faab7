//! Error types for the tandem work-order tool

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Unknown configuration value: {0}")]
    InvalidValue(String),
}

/// Operator-facing validation failures. Saving is aborted, the in-memory
/// order is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Contract number '{0}' is already used by another order")]
    DuplicateContractNumber(String),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidInput { field: String, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration of table '{table}' failed: {source}")]
    Migration {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No free id left in the {band} band")]
    IdBandExhausted { band: &'static str },

    #[error("Report generation error: {0}")]
    Report(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Could not delete {}: {source}", path.display())]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
