use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the balance report tool.
#[derive(Error, Debug)]
pub enum BalanceError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input ended before any line parsed as a `DD-MM-YYYY` date.
    #[error("No date line found")]
    MissingDate,

    /// The input ended right after the date line.
    #[error("Missing hour count after date on line {line}")]
    MissingHourCount { line: usize },

    /// The line after the date is not a non-negative integer.
    #[error("Invalid hour count on line {line}: {value:?}")]
    InvalidHourCount { line: usize, value: String },

    /// A data line's reading is not a floating-point number.
    #[error("Invalid reading on line {line}: {value:?}")]
    InvalidReading { line: usize, value: String },

    /// A data line has no comma separating reading and sign.
    #[error("Missing sign separator on line {line}: {value:?}")]
    MissingSign { line: usize, value: String },

    /// The input ended before all declared data lines were read.
    #[error("Expected {declared} data lines, found {found}")]
    TruncatedData { declared: usize, found: usize },

    /// The input pattern could not be compiled.
    #[error("Invalid input pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error raised while building or saving the output workbook.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// A JSON document could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the balance crates.
pub type Result<T> = std::result::Result<T, BalanceError>;
