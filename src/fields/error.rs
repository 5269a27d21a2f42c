// ABOUTME: Error types for data record construction
// ABOUTME: Covers malformed key=value assignments and unsupported JSON values

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Invalid field assignment '{0}'. Expected 'key=value'")]
    InvalidAssignment(String),

    #[error("Unsupported value for field '{key}': {reason}")]
    UnsupportedValue { key: String, reason: String },

    #[error("Data record must be a JSON object, found {0}")]
    NotAnObject(String),

    #[error("Invalid JSON data record: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FieldError>;
