// ABOUTME: Placeholder plan for one text part: resolved tag structure and collected syntax errors
// ABOUTME: Pairs loop sections within and across paragraphs before anything is substituted

use std::ops::Range;

use super::error::TemplateSyntaxError;
use super::result::{Placeholder, PlaceholderKind};
use super::scanner::{scan, Tag, TagKind};
use crate::package::DocumentPart;

/// A placeholder inside one paragraph's text. Spans are byte ranges of the
/// paragraph text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field {
        span: Range<usize>,
        name: String,
    },
    Section {
        /// From the start of the open tag to the end of the close tag.
        span: Range<usize>,
        /// Text between the two tags.
        body: Range<usize>,
        name: String,
        inverted: bool,
        children: Vec<Segment>,
    },
}

impl Segment {
    pub fn span(&self) -> &Range<usize> {
        match self {
            Segment::Field { span, .. } | Segment::Section { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphPlan {
    pub text: String,
    pub segments: Vec<Segment>,
}

/// A loop whose tags sit alone in two sibling paragraphs. Ranges are byte
/// ranges of the part XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSection {
    pub name: String,
    pub inverted: bool,
    /// Both tag paragraphs and everything between them.
    pub region: Range<usize>,
    /// XML strictly between the two tag paragraphs.
    pub body: Range<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct PartPlan {
    pub paragraphs: Vec<ParagraphPlan>,
    /// Ordered by region start; nested blocks follow their parent.
    pub blocks: Vec<BlockSection>,
    pub placeholders: Vec<Placeholder>,
    pub errors: Vec<TemplateSyntaxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagRole {
    Plain,
    Inline,
    Block,
    Broken,
}

struct OpenSection {
    paragraph: usize,
    tag: usize,
    name: String,
    inverted: bool,
}

impl PartPlan {
    pub fn build(part: &DocumentPart, paragraph_loop: bool) -> Self {
        let mut plan = PartPlan::default();
        let mut tags = Vec::with_capacity(part.paragraphs.len());

        for (index, paragraph) in part.paragraphs.iter().enumerate() {
            let text = paragraph.text();
            let scanned = scan(&text);

            for issue in scanned.issues {
                plan.errors.push(syntax_error(
                    &part.name,
                    &text,
                    index,
                    issue.offset,
                    issue.token,
                    issue.explanation,
                ));
            }
            for tag in &scanned.tags {
                if let Some(placeholder) = placeholder(&part.name, index, tag) {
                    plan.placeholders.push(placeholder);
                }
            }

            tags.push(scanned.tags);
            plan.paragraphs.push(ParagraphPlan {
                text,
                segments: Vec::new(),
            });
        }

        let roles = plan.pair_sections(part, &tags, paragraph_loop);
        for (index, (paragraph_tags, paragraph_roles)) in tags.iter().zip(&roles).enumerate() {
            plan.paragraphs[index].segments = build_segments(paragraph_tags, paragraph_roles);
        }

        plan.blocks.sort_by_key(|block| block.region.start);
        plan.errors
            .sort_by_key(|error| (error.paragraph, error.column));
        plan
    }

    /// Whether rendering can change this part at all.
    pub fn has_placeholders(&self) -> bool {
        !self.blocks.is_empty()
            || self
                .paragraphs
                .iter()
                .any(|paragraph| !paragraph.segments.is_empty())
    }

    fn pair_sections(
        &mut self,
        part: &DocumentPart,
        tags: &[Vec<Tag>],
        paragraph_loop: bool,
    ) -> Vec<Vec<TagRole>> {
        let mut roles: Vec<Vec<TagRole>> = tags
            .iter()
            .map(|paragraph_tags| vec![TagRole::Plain; paragraph_tags.len()])
            .collect();
        let mut open: Vec<OpenSection> = Vec::new();

        for (p, paragraph_tags) in tags.iter().enumerate() {
            for (t, tag) in paragraph_tags.iter().enumerate() {
                match &tag.kind {
                    TagKind::Field(_) => {}
                    TagKind::SectionOpen { name, inverted } => open.push(OpenSection {
                        paragraph: p,
                        tag: t,
                        name: name.clone(),
                        inverted: *inverted,
                    }),
                    TagKind::SectionClose(name) => {
                        let innermost = open.last().map(|section| section.name.clone());
                        match innermost {
                            None => {
                                roles[p][t] = TagRole::Broken;
                                self.push_error(
                                    part,
                                    p,
                                    tag,
                                    "Loop closing tag has no matching opening tag".to_string(),
                                );
                            }
                            Some(innermost) if innermost != *name => {
                                roles[p][t] = TagRole::Broken;
                                self.push_error(
                                    part,
                                    p,
                                    tag,
                                    format!(
                                        "Loop closing tag does not match the open loop {{{{#{}}}}}",
                                        innermost
                                    ),
                                );
                            }
                            Some(_) => {
                                if let Some(section) = open.pop() {
                                    self.close_section(
                                        part,
                                        tags,
                                        &mut roles,
                                        section,
                                        (p, t),
                                        paragraph_loop,
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }

        for section in open {
            roles[section.paragraph][section.tag] = TagRole::Broken;
            let tag = &tags[section.paragraph][section.tag];
            self.push_error(
                part,
                section.paragraph,
                tag,
                "Loop is never closed".to_string(),
            );
        }

        roles
    }

    fn close_section(
        &mut self,
        part: &DocumentPart,
        tags: &[Vec<Tag>],
        roles: &mut [Vec<TagRole>],
        section: OpenSection,
        (p, t): (usize, usize),
        paragraph_loop: bool,
    ) {
        if section.paragraph == p {
            roles[p][section.tag] = TagRole::Inline;
            roles[p][t] = TagRole::Inline;
            return;
        }

        let opener = &part.paragraphs[section.paragraph];
        let closer = &part.paragraphs[p];
        let is_block = paragraph_loop
            && stands_alone(
                &tags[section.paragraph],
                &self.paragraphs[section.paragraph].text,
            )
            && stands_alone(&tags[p], &self.paragraphs[p].text)
            && opener.parent == closer.parent
            && opener.range.end <= closer.range.start;

        if is_block {
            roles[section.paragraph][section.tag] = TagRole::Block;
            roles[p][t] = TagRole::Block;
            self.blocks.push(BlockSection {
                name: section.name,
                inverted: section.inverted,
                region: opener.range.start..closer.range.end,
                body: opener.range.end..closer.range.start,
            });
            return;
        }

        roles[section.paragraph][section.tag] = TagRole::Broken;
        roles[p][t] = TagRole::Broken;
        let explanation = if paragraph_loop {
            "Loop spans several paragraphs; its opening and closing tags must each sit alone \
             in a paragraph of their own"
        } else {
            "Loop must open and close within the same paragraph"
        };
        let tag = &tags[section.paragraph][section.tag];
        self.push_error(part, section.paragraph, tag, explanation.to_string());
    }

    fn push_error(&mut self, part: &DocumentPart, paragraph: usize, tag: &Tag, explanation: String) {
        let error = syntax_error(
            &part.name,
            &self.paragraphs[paragraph].text,
            paragraph,
            tag.span.start,
            tag.raw.clone(),
            explanation,
        );
        self.errors.push(error);
    }
}

/// The paragraph holds nothing but a single tag.
fn stands_alone(tags: &[Tag], text: &str) -> bool {
    tags.len() == 1 && text.trim() == tags[0].raw
}

struct Frame {
    open: Range<usize>,
    name: String,
    inverted: bool,
    children: Vec<Segment>,
}

fn build_segments(tags: &[Tag], roles: &[TagRole]) -> Vec<Segment> {
    let mut root = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();

    for (tag, role) in tags.iter().zip(roles) {
        let segment = match (&tag.kind, role) {
            (TagKind::Field(name), _) => Segment::Field {
                span: tag.span.clone(),
                name: name.clone(),
            },
            (TagKind::SectionOpen { name, inverted }, TagRole::Inline) => {
                frames.push(Frame {
                    open: tag.span.clone(),
                    name: name.clone(),
                    inverted: *inverted,
                    children: Vec::new(),
                });
                continue;
            }
            (TagKind::SectionClose(_), TagRole::Inline) => match frames.pop() {
                Some(frame) => Segment::Section {
                    span: frame.open.start..tag.span.end,
                    body: frame.open.end..tag.span.start,
                    name: frame.name,
                    inverted: frame.inverted,
                    children: frame.children,
                },
                None => continue,
            },
            _ => continue,
        };

        match frames.last_mut() {
            Some(frame) => frame.children.push(segment),
            None => root.push(segment),
        }
    }

    root
}

fn placeholder(part: &str, paragraph: usize, tag: &Tag) -> Option<Placeholder> {
    let (name, kind) = match &tag.kind {
        TagKind::Field(name) => (name, PlaceholderKind::Field),
        TagKind::SectionOpen {
            name,
            inverted: false,
        } => (name, PlaceholderKind::Section),
        TagKind::SectionOpen {
            name,
            inverted: true,
        } => (name, PlaceholderKind::InvertedSection),
        TagKind::SectionClose(_) => return None,
    };
    Some(Placeholder {
        part: part.to_string(),
        name: name.clone(),
        kind,
        paragraph: paragraph + 1,
    })
}

fn syntax_error(
    part: &str,
    text: &str,
    paragraph: usize,
    offset: usize,
    token: String,
    explanation: String,
) -> TemplateSyntaxError {
    TemplateSyntaxError {
        part: part.to_string(),
        token,
        explanation,
        paragraph: paragraph + 1,
        column: text[..offset].chars().count() + 1,
    }
}
