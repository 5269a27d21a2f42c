// ABOUTME: Document package module for zip-based word-processing templates
// ABOUTME: Exports archive loading/rebuilding and paragraph extraction from XML text parts

pub mod archive;
pub mod document;
pub mod error;

pub use archive::{TemplateArchive, CONTENT_TYPES_PART, DOCX_CONTENT_TYPE, MAIN_DOCUMENT_PART};
pub use document::{DocumentPart, Paragraph, TextNode};
pub use error::{ArchiveError, Result};
