// ABOUTME: Placeholder scanner over the flattened text of a single paragraph
// ABOUTME: Locates {{ }} delimited tags, classifies them, and reports malformed ones

use std::ops::Range;

pub const OPEN_DELIMITER: &str = "{{";
pub const CLOSE_DELIMITER: &str = "}}";

/// How much text before a stray close delimiter is quoted in its error.
const CONTEXT_CHARS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// `{{name}}`
    Field(String),
    /// `{{#name}}` or, when inverted, `{{^name}}`
    SectionOpen { name: String, inverted: bool },
    /// `{{/name}}`
    SectionClose(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Byte range of the tag in the paragraph text, delimiters included.
    pub span: Range<usize>,
    pub raw: String,
    pub kind: TagKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanIssue {
    pub offset: usize,
    pub token: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedText {
    pub tags: Vec<Tag>,
    pub issues: Vec<ScanIssue>,
}

/// Scan one paragraph's text left to right.
///
/// An open delimiter followed by another open delimiter before any close
/// leaves the first tag unclosed; scanning resumes at the second one.
pub fn scan(text: &str) -> ScannedText {
    let bytes = text.as_bytes();
    let mut scanned = ScannedText::default();
    let mut open: Option<usize> = None;
    let mut last_end = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i..].starts_with(OPEN_DELIMITER.as_bytes()) {
            if let Some(start) = open {
                scanned.issues.push(unclosed(text, start, i));
            }
            open = Some(i);
            i += OPEN_DELIMITER.len();
            continue;
        }

        if bytes[i..].starts_with(CLOSE_DELIMITER.as_bytes()) {
            let end = i + CLOSE_DELIMITER.len();
            match open.take() {
                Some(start) => {
                    let raw = &text[start..end];
                    let body = &text[start + OPEN_DELIMITER.len()..i];
                    match parse_expression(body) {
                        Ok(kind) => scanned.tags.push(Tag {
                            span: start..end,
                            raw: raw.to_string(),
                            kind,
                        }),
                        Err(explanation) => scanned.issues.push(ScanIssue {
                            offset: start,
                            token: raw.to_string(),
                            explanation,
                        }),
                    }
                }
                None => {
                    let context_start =
                        floor_char_boundary(text, i.saturating_sub(CONTEXT_CHARS)).max(last_end);
                    scanned.issues.push(ScanIssue {
                        offset: i,
                        token: text[context_start..end].to_string(),
                        explanation:
                            "Closing delimiter has no matching opening delimiter in this paragraph"
                                .to_string(),
                    });
                }
            }
            last_end = end;
            i = end;
            continue;
        }

        i += 1;
    }

    if let Some(start) = open {
        scanned.issues.push(unclosed(text, start, text.len()));
    }

    scanned
}

fn unclosed(text: &str, start: usize, end: usize) -> ScanIssue {
    ScanIssue {
        offset: start,
        token: text[start..end].to_string(),
        explanation: "Placeholder is never closed within its paragraph".to_string(),
    }
}

fn parse_expression(body: &str) -> Result<TagKind, String> {
    let expression = body.trim();

    if expression.is_empty() {
        return Err("Placeholder has no field name".to_string());
    }
    if expression.contains(['{', '}']) {
        return Err("Placeholder contains unbalanced braces".to_string());
    }

    if let Some(name) = expression.strip_prefix('/') {
        let name = name.trim();
        if name.is_empty() {
            return Err("Closing loop tag has no field name".to_string());
        }
        return Ok(TagKind::SectionClose(name.to_string()));
    }

    for (marker, inverted) in [('#', false), ('^', true)] {
        if let Some(name) = expression.strip_prefix(marker) {
            let name = name.trim();
            if name.is_empty() {
                return Err("Loop tag has no field name".to_string());
            }
            return Ok(TagKind::SectionOpen {
                name: name.to_string(),
                inverted,
            });
        }
    }

    Ok(TagKind::Field(expression.to_string()))
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> TagKind {
        TagKind::Field(name.to_string())
    }

    #[test]
    fn test_scans_fields() {
        let scanned = scan("Dear {{firstName}} {{ last_name }},");

        assert!(scanned.issues.is_empty());
        assert_eq!(scanned.tags.len(), 2);
        assert_eq!(scanned.tags[0].kind, field("firstName"));
        assert_eq!(scanned.tags[0].span, 5..18);
        assert_eq!(scanned.tags[1].kind, field("last_name"));
        assert_eq!(scanned.tags[1].raw, "{{ last_name }}");
    }

    #[test]
    fn test_scans_sections() {
        let scanned = scan("{{#items}}{{name}}{{/items}}{{^items}}none{{/items}}");

        let kinds: Vec<TagKind> = scanned.tags.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TagKind::SectionOpen {
                    name: "items".to_string(),
                    inverted: false
                },
                field("name"),
                TagKind::SectionClose("items".to_string()),
                TagKind::SectionOpen {
                    name: "items".to_string(),
                    inverted: true
                },
                TagKind::SectionClose("items".to_string()),
            ]
        );
    }

    #[test]
    fn test_unclosed_tag() {
        let scanned = scan("Hello {{firstName");

        assert!(scanned.tags.is_empty());
        assert_eq!(scanned.issues.len(), 1);
        assert_eq!(scanned.issues[0].token, "{{firstName");
        assert_eq!(scanned.issues[0].offset, 6);
    }

    #[test]
    fn test_reopened_tag_leaves_first_unclosed() {
        let scanned = scan("{{first {{last}}");

        assert_eq!(scanned.tags.len(), 1);
        assert_eq!(scanned.tags[0].kind, field("last"));
        assert_eq!(scanned.issues.len(), 1);
        assert_eq!(scanned.issues[0].token, "{{first ");
    }

    #[test]
    fn test_unopened_tag() {
        let scanned = scan("{{a}} then b}}");

        assert_eq!(scanned.tags.len(), 1);
        assert_eq!(scanned.issues.len(), 1);
        assert_eq!(scanned.issues[0].token, " then b}}");
    }

    #[test]
    fn test_malformed_expressions() {
        for text in ["{{}}", "{{  }}", "{{a{b}}", "{{#}}", "{{/ }}"] {
            let scanned = scan(text);
            assert!(scanned.tags.is_empty(), "{}", text);
            assert_eq!(scanned.issues.len(), 1, "{}", text);
        }
    }

    #[test]
    fn test_single_braces_are_literal() {
        let scanned = scan("a { b } c");
        assert!(scanned.tags.is_empty());
        assert!(scanned.issues.is_empty());
    }

    #[test]
    fn test_multibyte_text_around_tags() {
        let scanned = scan("Grüße {{name}} — ünd}}");
        assert_eq!(scanned.tags.len(), 1);
        assert_eq!(scanned.issues.len(), 1);
        assert!(scanned.issues[0].token.ends_with("ünd}}"));
    }
}
