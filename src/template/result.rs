// ABOUTME: Render outcome types: generated documents, render stages, and template inspections
// ABOUTME: A render yields either a GeneratedDocument or a RenderFailure

use chrono::Utc;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ErrorReport, RenderFailure};
use crate::package::DOCX_CONTENT_TYPE;

pub type RenderResult = std::result::Result<GeneratedDocument, RenderFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStage {
    Loaded,
    Parsed,
    Scanned,
    Substituted,
    Serialized,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStage::Loaded => "loaded",
            RenderStage::Parsed => "parsed",
            RenderStage::Scanned => "scanned",
            RenderStage::Substituted => "substituted",
            RenderStage::Serialized => "serialized",
        };
        f.write_str(name)
    }
}

/// A successfully rendered document package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    bytes: Vec<u8>,
    filename: String,
    rewritten_parts: Vec<String>,
}

impl GeneratedDocument {
    pub fn new(bytes: Vec<u8>, rewritten_parts: Vec<String>) -> Self {
        Self {
            bytes,
            filename: default_filename(),
            rewritten_parts,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Name the document after the template it was rendered from.
    pub fn with_template_stem(self, stem: &str) -> Self {
        self.with_filename(suggested_filename(stem))
    }

    /// Suggested download name, `<template-stem>-<UTC timestamp>.docx`.
    /// Documents rendered without a known template use the stem `document`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        DOCX_CONTENT_TYPE
    }

    /// Text parts whose content changed. Every other part was copied raw.
    pub fn rewritten_parts(&self) -> &[String] {
        &self.rewritten_parts
    }
}

const DEFAULT_STEM: &str = "document";

fn default_filename() -> String {
    suggested_filename(DEFAULT_STEM)
}

/// `<stem>-<UTC timestamp>.docx`, e.g. `offer-20240102T030405Z.docx`.
pub fn suggested_filename(stem: &str) -> String {
    format!("{}-{}.docx", stem, Utc::now().format("%Y%m%dT%H%M%SZ"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Field,
    Section,
    InvertedSection,
}

/// One well-formed placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub part: String,
    pub name: String,
    pub kind: PlaceholderKind,
    /// 1-based paragraph number within the part.
    pub paragraph: usize,
}

/// What a template asks for, collected without rendering it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateInspection {
    /// Text parts that were scanned, in archive order.
    pub parts: Vec<String>,
    pub placeholders: Vec<Placeholder>,
    pub errors: ErrorReport,
}

impl TemplateInspection {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Distinct names referenced by the template, in first-use order.
    pub fn field_names(&self) -> IndexSet<&str> {
        self.placeholders
            .iter()
            .map(|placeholder| placeholder.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_document_defaults() {
        let document = GeneratedDocument::new(vec![1, 2, 3], vec!["word/document.xml".to_string()]);

        assert_eq!(document.size(), 3);
        assert_eq!(document.content_type(), DOCX_CONTENT_TYPE);
        assert!(document.filename().starts_with("document-"));
        assert!(document.filename().ends_with("Z.docx"));

        let stemmed = document.clone().with_template_stem("offer");
        let timestamp = stemmed
            .filename()
            .strip_prefix("offer-")
            .and_then(|rest| rest.strip_suffix("Z.docx"))
            .unwrap();
        assert_eq!(timestamp.len(), "20240102T030405".len());
        assert!(timestamp.starts_with(|c: char| c.is_ascii_digit()));

        let renamed = document.with_filename("offer-letter.docx");
        assert_eq!(renamed.filename(), "offer-letter.docx");
    }

    #[test]
    fn test_inspection_field_names_are_unique() {
        let placeholder = |name: &str, kind| Placeholder {
            part: "word/document.xml".to_string(),
            name: name.to_string(),
            kind,
            paragraph: 1,
        };
        let inspection = TemplateInspection {
            parts: vec!["word/document.xml".to_string()],
            placeholders: vec![
                placeholder("items", PlaceholderKind::Section),
                placeholder("name", PlaceholderKind::Field),
                placeholder("items", PlaceholderKind::InvertedSection),
            ],
            errors: ErrorReport::new(),
        };

        assert!(inspection.is_valid());
        let names: Vec<&str> = inspection.field_names().into_iter().collect();
        assert_eq!(names, vec!["items", "name"]);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(RenderStage::Substituted.to_string(), "substituted");
        assert_eq!(
            serde_json::to_string(&RenderStage::Parsed).unwrap(),
            "\"parsed\""
        );
    }
}
