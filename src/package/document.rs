// ABOUTME: Paragraph extraction from WordprocessingML text parts
// ABOUTME: Records byte offsets of paragraphs and text runs so content can be spliced back in place

use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::ops::Range;

use super::error::{ArchiveError, Result};

const PARAGRAPH_TAG: &[u8] = b"w:p";
const TEXT_TAG: &[u8] = b"w:t";

/// One `<w:t>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// Byte range of the start tag, e.g. `<w:t xml:space="preserve">`.
    pub tag: Range<usize>,
    /// Byte range of the escaped content between start and end tags.
    pub content: Range<usize>,
    /// Unescaped content.
    pub text: String,
}

/// One `<w:p>` element and the text nodes that belong directly to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Byte range from `<w:p` through `</w:p>`.
    pub range: Range<usize>,
    /// Start offset of the enclosing element, `None` at the document root.
    pub parent: Option<usize>,
    pub nodes: Vec<TextNode>,
}

impl Paragraph {
    /// The paragraph's text with run boundaries removed.
    pub fn text(&self) -> String {
        self.nodes.iter().map(|node| node.text.as_str()).collect()
    }
}

/// A parsed text part. Paragraphs are ordered by their start offset, so an
/// enclosing paragraph precedes the text-box paragraphs nested inside it.
#[derive(Debug, Clone)]
pub struct DocumentPart {
    pub name: String,
    pub xml: String,
    pub paragraphs: Vec<Paragraph>,
}

impl DocumentPart {
    pub fn parse(name: &str, xml: String) -> Result<Self> {
        let paragraphs = extract_paragraphs(name, &xml)?;
        Ok(Self {
            name: name.to_string(),
            xml,
            paragraphs,
        })
    }
}

const BYTE_ORDER_MARK: char = '\u{FEFF}';

fn extract_paragraphs(part: &str, xml: &str) -> Result<Vec<Paragraph>> {
    // The reader skips a leading byte-order mark without counting it in its
    // positions, so parse past it and shift every offset back into `xml`.
    let body = xml.strip_prefix(BYTE_ORDER_MARK).unwrap_or(xml);
    let base = xml.len() - body.len();
    let mut reader = Reader::from_str(body);

    let mut elements: Vec<usize> = Vec::new();
    let mut open_paragraphs: Vec<Paragraph> = Vec::new();
    let mut open_text: Option<Range<usize>> = None;
    let mut paragraphs = Vec::new();

    loop {
        let start = base + reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| ArchiveError::MalformedXml {
            part: part.to_string(),
            position: start,
            message: e.to_string(),
        })?;
        let end = base + reader.buffer_position() as usize;

        match event {
            Event::Start(element) => {
                match element.name().as_ref() {
                    PARAGRAPH_TAG => open_paragraphs.push(Paragraph {
                        range: start..start,
                        parent: elements.last().copied(),
                        nodes: Vec::new(),
                    }),
                    TEXT_TAG => open_text = Some(start..end),
                    _ => {}
                }
                elements.push(start);
            }
            Event::End(element) => {
                elements.pop();
                match element.name().as_ref() {
                    TEXT_TAG => {
                        if let Some(tag) = open_text.take() {
                            let content = tag.end..start;
                            let text = unescape(&xml[content.clone()])
                                .map_err(|e| ArchiveError::MalformedXml {
                                    part: part.to_string(),
                                    position: content.start,
                                    message: e.to_string(),
                                })?
                                .into_owned();
                            if let Some(paragraph) = open_paragraphs.last_mut() {
                                paragraph.nodes.push(TextNode { tag, content, text });
                            }
                        }
                    }
                    PARAGRAPH_TAG => {
                        if let Some(mut paragraph) = open_paragraphs.pop() {
                            paragraph.range.end = end;
                            paragraphs.push(paragraph);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs.sort_by_key(|paragraph| paragraph.range.start);
    Ok(paragraphs)
}
