//! Error types for the muscu_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for muscu_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Uploaded document is missing a sheet or column, or holds an unparseable value.
    /// Nothing from the document is installed when this is returned.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A new record violates a data model constraint
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog already holds this (category, exercise) pair
    #[error("Duplicate entry: {category} / {exercise} already in catalog")]
    DuplicateEntry { category: String, exercise: String },

    /// Caller supplied an unusable argument (empty names and the like)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Spreadsheet could not be opened or read
    #[error("Spreadsheet read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    /// Spreadsheet could not be written
    #[error("Spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// First constraint a new session record failed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("exercise {exercise} is not listed under category {category}")]
    UnknownExercise { category: String, exercise: String },

    #[error("category {0} cannot be logged as a strength session")]
    CardioInStrengthLog(String),

    #[error("category {0} cannot be logged as a cardio session")]
    NotCardio(String),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a whole number, got {value}")]
    NotInteger { field: &'static str, value: f64 },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("difficulty rating must be between 1 and 5, got {0}")]
    DifficultyOutOfRange(u8),

    #[error("duration must be at least {min} minutes, got {value}")]
    DurationTooShort { value: f64, min: f64 },

    #[error("{field} must be a serialized sequence: {reason}")]
    MalformedSequence { field: &'static str, reason: String },

    #[error("superset partner {0} was not logged on the same day")]
    UnknownSuperset(String),
}
