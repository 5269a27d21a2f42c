// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Builds in-memory document packages and temporary working directories

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use docmerge::package::{TemplateArchive, CONTENT_TYPES_PART, MAIN_DOCUMENT_PART};
use docmerge::GeneratedDocument;

pub const WORD_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

/// One paragraph with a single run.
pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text)
}

/// One paragraph whose runs hold the given pieces of text.
pub fn split_paragraph(pieces: &[&str]) -> String {
    let runs: String = pieces
        .iter()
        .map(|piece| format!("<w:r><w:t>{}</w:t></w:r>", piece))
        .collect();
    format!("<w:p>{}</w:p>", runs)
}

pub struct TestDocumentBuilder {
    prolog: String,
    body: Vec<String>,
    parts: Vec<(String, String)>,
    media: Vec<(String, Vec<u8>)>,
}

impl TestDocumentBuilder {
    pub fn new() -> Self {
        Self {
            prolog: XML_DECLARATION.to_string(),
            body: Vec::new(),
            parts: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Replace the XML declaration written before the main document element.
    pub fn with_prolog(mut self, prolog: &str) -> Self {
        self.prolog = prolog.to_string();
        self
    }

    pub fn with_paragraph(mut self, text: &str) -> Self {
        self.body.push(paragraph(text));
        self
    }

    pub fn with_split_paragraph(mut self, pieces: &[&str]) -> Self {
        self.body.push(split_paragraph(pieces));
        self
    }

    pub fn with_header(mut self, number: u32, text: &str) -> Self {
        let xml = format!(
            r#"<w:hdr xmlns:w="{}">{}</w:hdr>"#,
            WORD_NAMESPACE,
            paragraph(text)
        );
        self.parts.push((format!("word/header{}.xml", number), xml));
        self
    }

    pub fn with_media(mut self, name: &str, content: &[u8]) -> Self {
        self.media.push((name.to_string(), content.to_vec()));
        self
    }

    pub fn document_xml(&self) -> String {
        format!(
            r#"{}<w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
            self.prolog,
            WORD_NAMESPACE,
            self.body.concat()
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        writer.start_file(CONTENT_TYPES_PART, deflated).unwrap();
        writer.write_all(CONTENT_TYPES.as_bytes()).unwrap();

        writer.start_file(MAIN_DOCUMENT_PART, deflated).unwrap();
        writer.write_all(self.document_xml().as_bytes()).unwrap();

        for (name, xml) in &self.parts {
            writer.start_file(name.as_str(), deflated).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        for (name, content) in &self.media {
            writer.start_file(name.as_str(), stored).unwrap();
            writer.write_all(content).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }

    pub fn build_archive(&self) -> TemplateArchive {
        TemplateArchive::from_bytes(self.build()).unwrap()
    }
}

/// The `<w:body>` content of a rendered document.
pub fn rendered_body(document: &GeneratedDocument) -> String {
    let archive = TemplateArchive::from_bytes(document.bytes().to_vec()).unwrap();
    let xml = archive.read_text_part(MAIN_DOCUMENT_PART).unwrap();
    let start = xml.find("<w:body>").unwrap() + "<w:body>".len();
    let end = xml.find("</w:body>").unwrap();
    xml[start..end].to_string()
}

/// Concatenated text of every `<w:t>` element in a part.
pub fn visible_text(xml: &str) -> String {
    let mut text = String::new();
    let mut rest = xml;
    while let Some(open) = rest.find("<w:t") {
        let after_tag = &rest[open..];
        let Some(tag_end) = after_tag.find('>') else {
            break;
        };
        if after_tag[..tag_end].ends_with('/') || !after_tag[4..].starts_with(['>', ' ']) {
            rest = &after_tag[tag_end + 1..];
            continue;
        }
        let content = &after_tag[tag_end + 1..];
        let Some(close) = content.find("</w:t>") else {
            break;
        };
        text.push_str(&content[..close]);
        rest = &content[close..];
    }
    text
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn template_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.docx", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_output.docx", name))
    }

    pub async fn create_template_file(&self, name: &str, builder: &TestDocumentBuilder) -> PathBuf {
        let template_file = self.template_file(name);
        tokio::fs::write(&template_file, builder.build())
            .await
            .expect("Failed to write template file");
        template_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let builder = TestDocumentBuilder::new()
            .with_paragraph("Hello {{name}}")
            .with_header(1, "Header");
        let archive = builder.build_archive();

        assert!(archive.contains_part(MAIN_DOCUMENT_PART));
        assert!(archive.contains_part("word/header1.xml"));
        assert!(builder.document_xml().contains("Hello {{name}}"));
    }

    #[test]
    fn test_visible_text() {
        let xml = r#"<w:p><w:r><w:t>Hello </w:t><w:tab/><w:t xml:space="preserve">Ada</w:t></w:r></w:p>"#;
        assert_eq!(visible_text(xml), "Hello Ada");
    }
}
