//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>ms, <number>s, <number>m, or <number>m<number>s (e.g., 500ms, 3s, 1m, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a custom widget size is not a number
#[derive(Debug, Clone, Error)]
#[error("Please enter valid numbers (got \"{input}\")")]
pub struct InvalidSizeInput {
    pub input: String,
}

/// Error when an unknown widget name is given
#[derive(Debug, Clone, Error)]
#[error("Invalid widget: \"{input}\". Valid widgets are: buttons, gesture-box, indicator")]
pub struct InvalidWidgetError {
    pub input: String,
}

/// Error when an unknown pointer phase is given
#[derive(Debug, Clone, Error)]
#[error("Invalid pointer phase: \"{input}\". Valid phases are: down, move, up, cancel")]
pub struct InvalidPointerPhase {
    pub input: String,
}

/// Error when reading or writing preferences fails
#[derive(Debug, Clone, Error)]
pub enum PreferenceError {
    #[error("Failed to read preferences file: {0}")]
    ReadError(String),

    #[error("Failed to parse preferences file: {0}")]
    ParseError(String),

    #[error("Failed to write preferences file: {0}")]
    WriteError(String),

    #[error("Invalid value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Preferences file already exists at: {0}")]
    AlreadyExists(String),
}
