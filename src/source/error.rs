// ABOUTME: Error types for template source operations
// ABOUTME: Covers unreadable files, invalid locations, and failed HTTP fetches

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Template not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid template location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("{source_name} source cannot load {location}")]
    Unsupported {
        source_name: &'static str,
        location: String,
    },

    #[error("Fetching {url} failed with HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;
