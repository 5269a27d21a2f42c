// ABOUTME: Template engine that merges normalized field data into a document package
// ABOUTME: Runs the load, parse, scan, substitute and serialize stages with cooperative cancellation

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::context::Scope;
use super::error::{ErrorReport, RenderFailure, Result};
use super::plan::{BlockSection, PartPlan, Segment};
use super::result::{GeneratedDocument, RenderResult, RenderStage, TemplateInspection};
use crate::fields::{normalize, DataRecord, NormalizedFields, NormalizedValue};
use crate::package::{DocumentPart, TemplateArchive};

const PRESERVED_TEXT_TAG: &str = r#"<w:t xml:space="preserve">"#;
const LINE_BREAK: &str = r#"</w:t><w:br/><w:t xml:space="preserve">"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Turn newlines in substituted text into line breaks.
    pub linebreaks: bool,
    /// Allow loops whose tags sit alone in their own paragraphs to repeat
    /// the paragraphs between them.
    pub paragraph_loop: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            linebreaks: true,
            paragraph_loop: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    options: RenderOptions,
}

impl TemplateEngine {
    /// Create an engine with line breaks and paragraph loops enabled
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render with an already normalized mapping
    pub fn render(&self, archive: &TemplateArchive, fields: &NormalizedFields) -> RenderResult {
        self.render_cancellable(archive, fields, &CancellationToken::new())
    }

    /// Normalize `record` and render it
    pub fn render_record(&self, archive: &TemplateArchive, record: &DataRecord) -> RenderResult {
        let fields = normalize(record);
        self.render(archive, &fields)
    }

    /// Open `bytes` as a template, normalize `record` and render it
    pub fn render_bytes(&self, bytes: &[u8], record: &DataRecord) -> RenderResult {
        self.render_bytes_cancellable(bytes, record, &CancellationToken::new())
    }

    pub fn render_bytes_cancellable(
        &self,
        bytes: &[u8],
        record: &DataRecord,
        cancel: &CancellationToken,
    ) -> RenderResult {
        checkpoint(cancel, RenderStage::Loaded)?;
        let archive = TemplateArchive::from_bytes(bytes)?;
        let fields = normalize(record);
        self.render_cancellable(&archive, &fields, cancel)
    }

    /// Render, checking `cancel` before every stage.
    ///
    /// Placeholder errors from every text part are collected before anything
    /// is substituted; any error fails the whole render.
    pub fn render_cancellable(
        &self,
        archive: &TemplateArchive,
        fields: &NormalizedFields,
        cancel: &CancellationToken,
    ) -> RenderResult {
        checkpoint(cancel, RenderStage::Parsed)?;
        let parts = self.load_parts(archive)?;

        checkpoint(cancel, RenderStage::Scanned)?;
        let plans: Vec<PartPlan> = parts
            .iter()
            .map(|part| PartPlan::build(part, self.options.paragraph_loop))
            .collect();

        let mut report = ErrorReport::new();
        for plan in &plans {
            report.extend_part(plan.errors.clone());
        }
        if !report.is_empty() {
            debug!(
                "Template has {} placeholder errors across {} parts",
                report.len(),
                report.parts().len()
            );
            return Err(RenderFailure::Template(report));
        }

        checkpoint(cancel, RenderStage::Substituted)?;
        let scope = Scope::root(fields);
        let mut replacements = HashMap::new();
        let mut rewritten = Vec::new();
        for (part, plan) in parts.iter().zip(&plans) {
            if !plan.has_placeholders() {
                continue;
            }
            let renderer = PartRenderer {
                part,
                plan,
                options: &self.options,
            };
            let xml = renderer.render(&scope);
            if xml != part.xml {
                rewritten.push(part.name.clone());
                replacements.insert(part.name.clone(), xml);
            }
        }

        checkpoint(cancel, RenderStage::Serialized)?;
        let bytes = if replacements.is_empty() {
            archive.as_bytes().to_vec()
        } else {
            archive.rebuild(&replacements)?
        };

        info!(
            "Rendered document: {} of {} text parts rewritten, {} bytes",
            rewritten.len(),
            parts.len(),
            bytes.len()
        );

        Ok(GeneratedDocument::new(bytes, rewritten))
    }

    /// List every placeholder and syntax error without rendering.
    pub fn inspect(&self, archive: &TemplateArchive) -> Result<TemplateInspection> {
        let parts = self.load_parts(archive)?;

        let mut inspection = TemplateInspection::default();
        for part in &parts {
            let plan = PartPlan::build(part, self.options.paragraph_loop);
            inspection.parts.push(part.name.clone());
            inspection.placeholders.extend(plan.placeholders);
            inspection.errors.extend_part(plan.errors);
        }

        info!(
            "Inspected template: {} placeholders, {} errors",
            inspection.placeholders.len(),
            inspection.errors.len()
        );

        Ok(inspection)
    }

    fn load_parts(&self, archive: &TemplateArchive) -> Result<Vec<DocumentPart>> {
        let mut parts = Vec::new();
        for name in archive.text_part_names() {
            let xml = archive.read_text_part(name)?;
            let part = DocumentPart::parse(name, xml)?;
            debug!("Parsed {}: {} paragraphs", name, part.paragraphs.len());
            parts.push(part);
        }
        Ok(parts)
    }
}

/// Render on the blocking thread pool so async callers are not stalled.
pub async fn render_blocking(
    engine: TemplateEngine,
    template: Vec<u8>,
    record: DataRecord,
    cancel: CancellationToken,
) -> RenderResult {
    tokio::task::spawn_blocking(move || {
        engine.render_bytes_cancellable(&template, &record, &cancel)
    })
    .await?
}

fn checkpoint(cancel: &CancellationToken, next: RenderStage) -> Result<()> {
    if cancel.is_cancelled() {
        warn!("Render cancelled before the {} stage", next);
        return Err(RenderFailure::Cancelled(next));
    }
    debug!("Entering {} stage", next);
    Ok(())
}

struct PartRenderer<'p> {
    part: &'p DocumentPart,
    plan: &'p PartPlan,
    options: &'p RenderOptions,
}

impl PartRenderer<'_> {
    fn render(&self, scope: &Scope<'_>) -> String {
        self.render_range(0..self.part.xml.len(), scope)
    }

    /// Render `range` of the part XML. Blocks are expanded first; paragraphs
    /// inside a block are rendered once per iteration by the recursive call.
    fn render_range(&self, range: Range<usize>, scope: &Scope<'_>) -> String {
        let xml = &self.part.xml;
        let blocks = top_level_blocks(&self.plan.blocks, &range);
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();

        for block in &blocks {
            let content = repeat_section(scope, &block.name, block.inverted, |item| {
                self.render_range(block.body.clone(), item)
            });
            edits.push((block.region.clone(), content));
        }

        for (paragraph, plan) in self.part.paragraphs.iter().zip(&self.plan.paragraphs) {
            if plan.segments.is_empty()
                || paragraph.range.start < range.start
                || paragraph.range.end > range.end
                || blocks
                    .iter()
                    .any(|block| block.region.contains(&paragraph.range.start))
            {
                continue;
            }

            let replacements = resolve_segments(&plan.text, &plan.segments, scope);
            let mut offset = 0;
            for node in &paragraph.nodes {
                let span = offset..offset + node.text.len();
                offset = span.end;
                if let Some(text) = assemble(&plan.text, span, &replacements) {
                    edits.push((node.tag.start..node.content.end, self.text_node(&text)));
                }
            }
        }

        edits.sort_by_key(|(span, _)| span.start);

        let mut out = String::with_capacity(range.len());
        let mut cursor = range.start;
        for (span, content) in edits {
            out.push_str(&xml[cursor..span.start]);
            out.push_str(&content);
            cursor = span.end;
        }
        out.push_str(&xml[cursor..range.end]);
        out
    }

    /// Start tag and escaped content for a rewritten text node. The original
    /// end tag stays in place.
    fn text_node(&self, text: &str) -> String {
        let escaped = escape(text);
        let mut node = String::from(PRESERVED_TEXT_TAG);
        if self.options.linebreaks {
            // `\r\n`, a lone `\r` and `\n` each count as one break.
            let normalized = escaped.replace("\r\n", "\n").replace('\r', "\n");
            node.push_str(&normalized.replace('\n', LINE_BREAK));
        } else {
            node.push_str(&escaped);
        }
        node
    }
}

/// Blocks inside `range` that are not nested in another block inside it.
fn top_level_blocks<'b>(blocks: &'b [BlockSection], range: &Range<usize>) -> Vec<&'b BlockSection> {
    let mut selected: Vec<&BlockSection> = Vec::new();
    for block in blocks {
        if block.region.start < range.start || block.region.end > range.end {
            continue;
        }
        if let Some(last) = selected.last() {
            if block.region.start < last.region.end {
                continue;
            }
        }
        selected.push(block);
    }
    selected
}

/// Render a section body once per iteration its value calls for.
fn repeat_section(
    scope: &Scope<'_>,
    name: &str,
    inverted: bool,
    mut render: impl FnMut(&Scope<'_>) -> String,
) -> String {
    if inverted {
        return if scope.is_truthy(name) {
            String::new()
        } else {
            render(scope)
        };
    }

    match scope.lookup(name) {
        Some(NormalizedValue::List(items)) => items
            .iter()
            .map(|item| render(&scope.child(item)))
            .collect(),
        Some(NormalizedValue::Text(text)) if !text.is_empty() => render(scope),
        _ => String::new(),
    }
}

struct Replacement {
    span: Range<usize>,
    value: String,
}

fn resolve_segments(text: &str, segments: &[Segment], scope: &Scope<'_>) -> Vec<Replacement> {
    segments
        .iter()
        .map(|segment| Replacement {
            span: segment.span().clone(),
            value: resolve_segment(text, segment, scope),
        })
        .collect()
}

fn resolve_segment(text: &str, segment: &Segment, scope: &Scope<'_>) -> String {
    match segment {
        Segment::Field { name, .. } => scope.resolve_text(name).to_string(),
        Segment::Section {
            body,
            name,
            inverted,
            children,
            ..
        } => repeat_section(scope, name, *inverted, |item| {
            render_span(text, body.clone(), children, item)
        }),
    }
}

fn render_span(text: &str, body: Range<usize>, children: &[Segment], scope: &Scope<'_>) -> String {
    let mut out = String::new();
    let mut cursor = body.start;
    for child in children {
        let span = child.span();
        out.push_str(&text[cursor..span.start]);
        out.push_str(&resolve_segment(text, child, scope));
        cursor = span.end;
    }
    out.push_str(&text[cursor..body.end]);
    out
}

/// New text for the node covering `node` of the paragraph text, or `None`
/// when no replacement touches it. A replacement's value lands in the node
/// where its span starts; the rest of the span is removed from later nodes.
fn assemble(text: &str, node: Range<usize>, replacements: &[Replacement]) -> Option<String> {
    let mut touched = false;
    let mut out = String::new();
    let mut cursor = node.start;

    for replacement in replacements {
        let span = &replacement.span;
        if span.end <= node.start || span.start >= node.end {
            continue;
        }
        touched = true;
        if span.start > cursor {
            out.push_str(&text[cursor..span.start]);
        }
        if span.start >= node.start {
            out.push_str(&replacement.value);
        }
        cursor = cursor.max(span.end.min(node.end));
    }

    if !touched {
        return None;
    }
    out.push_str(&text[cursor..node.end]);
    Some(out)
}
