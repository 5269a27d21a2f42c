// ABOUTME: Template archive wrapper around a zip-based document package
// ABOUTME: Validates packages, reads parts, and rebuilds archives with rewritten text parts

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::error::{ArchiveError, Result};

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

const FOOTNOTES_PART: &str = "word/footnotes.xml";
const ENDNOTES_PART: &str = "word/endnotes.xml";

/// An opened document package. The bytes are never modified; rendering
/// produces a new archive through [`TemplateArchive::rebuild`].
#[derive(Debug, Clone)]
pub struct TemplateArchive {
    bytes: Vec<u8>,
    part_names: Vec<String>,
}

impl TemplateArchive {
    /// Open `bytes` as a package, requiring the content-types and main document parts.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        let part_names = {
            let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice()))?;
            let mut names = Vec::with_capacity(archive.len());
            for index in 0..archive.len() {
                let file = archive.by_index_raw(index)?;
                names.push(file.name().to_string());
            }
            names
        };

        for required in [CONTENT_TYPES_PART, MAIN_DOCUMENT_PART] {
            if !part_names.iter().any(|name| name == required) {
                return Err(ArchiveError::MissingPart(required.to_string()));
            }
        }

        debug!(
            "Opened document package: {} parts, {} bytes",
            part_names.len(),
            bytes.len()
        );

        Ok(Self { bytes, part_names })
    }

    /// All part names in archive order.
    pub fn part_names(&self) -> &[String] {
        &self.part_names
    }

    /// Parts whose paragraphs are scanned for placeholders, in archive order.
    pub fn text_part_names(&self) -> impl Iterator<Item = &str> {
        self.part_names
            .iter()
            .map(|name| name.as_str())
            .filter(|name| is_text_part(name))
    }

    pub fn contains_part(&self, name: &str) -> bool {
        self.part_names.iter().any(|part| part == name)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Decompressed content of one part.
    pub fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.open()?;
        let mut file = archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => ArchiveError::MissingPart(name.to_string()),
            other => ArchiveError::InvalidArchive(other),
        })?;
        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    pub fn read_text_part(&self, name: &str) -> Result<String> {
        String::from_utf8(self.read_part(name)?).map_err(|_| ArchiveError::InvalidEncoding {
            part: name.to_string(),
        })
    }

    /// Write a new package in the original entry order.
    ///
    /// Parts named in `replacements` are recompressed with their new content;
    /// every other entry is copied raw, so its bytes are unchanged.
    pub fn rebuild(&self, replacements: &HashMap<String, String>) -> Result<Vec<u8>> {
        let mut source = self.open()?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(self.bytes.len())));

        for index in 0..source.len() {
            let file = source.by_index_raw(index)?;
            match replacements.get(file.name()) {
                Some(content) => {
                    let method = match file.compression() {
                        CompressionMethod::Stored => CompressionMethod::Stored,
                        _ => CompressionMethod::Deflated,
                    };
                    let name = file.name().to_string();
                    drop(file);

                    let options = SimpleFileOptions::default().compression_method(method);
                    writer.start_file(name.as_str(), options)?;
                    writer.write_all(content.as_bytes())?;
                    debug!("Rewrote part {} ({} bytes)", name, content.len());
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }

    fn open(&self) -> Result<ZipArchive<Cursor<&[u8]>>> {
        Ok(ZipArchive::new(Cursor::new(self.bytes.as_slice()))?)
    }
}

/// Whether a part holds paragraph text that may contain placeholders.
pub fn is_text_part(name: &str) -> bool {
    name == MAIN_DOCUMENT_PART
        || name == FOOTNOTES_PART
        || name == ENDNOTES_PART
        || is_numbered_part(name, "word/header")
        || is_numbered_part(name, "word/footer")
}

fn is_numbered_part(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .map(|number| number.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
