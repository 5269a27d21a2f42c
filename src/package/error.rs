// ABOUTME: Error types for document package operations
// ABOUTME: Covers unreadable archives, missing parts, and malformed XML text parts

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Template is not a readable document package: {0}")]
    InvalidArchive(#[from] zip::result::ZipError),

    #[error("Document package is missing required part '{0}'")]
    MissingPart(String),

    #[error("Part '{part}' is not valid UTF-8 text")]
    InvalidEncoding { part: String },

    #[error("Malformed XML in part '{part}' near byte {position}: {message}")]
    MalformedXml {
        part: String,
        position: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
