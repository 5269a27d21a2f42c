// ABOUTME: Output formatters for template error reports and inspections (JSON, YAML, text)
// ABOUTME: Turns render failures into structured payloads or a human readable message

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use super::error::{OutputError, Result};
use crate::template::{ErrorReport, PlaceholderKind, TemplateInspection, RETYPE_GUIDANCE};

#[async_trait]
pub trait OutputFormatter: Send + Sync {
    async fn format_report(&self, report: &ErrorReport) -> Result<String>;

    async fn format_inspection(&self, inspection: &TemplateInspection) -> Result<String>;
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct YamlFormatter;

pub struct TextFormatter;

fn report_value(report: &ErrorReport) -> Result<JsonValue> {
    Ok(json!({
        "status": "failed",
        "error_count": report.len(),
        "errors": serde_json::to_value(report.errors())?,
        "guidance": RETYPE_GUIDANCE,
    }))
}

fn inspection_value(inspection: &TemplateInspection) -> Result<JsonValue> {
    Ok(json!({
        "valid": inspection.is_valid(),
        "parts": inspection.parts,
        "fields": inspection.field_names(),
        "placeholders": serde_json::to_value(&inspection.placeholders)?,
        "errors": serde_json::to_value(inspection.errors.errors())?,
    }))
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn new_pretty() -> Self {
        Self { pretty: true }
    }

    fn serialize(&self, value: &JsonValue) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value).map_err(OutputError::SerializationError)
        } else {
            serde_json::to_string(value).map_err(OutputError::SerializationError)
        }
    }
}

#[async_trait]
impl OutputFormatter for JsonFormatter {
    async fn format_report(&self, report: &ErrorReport) -> Result<String> {
        self.serialize(&report_value(report)?)
    }

    async fn format_inspection(&self, inspection: &TemplateInspection) -> Result<String> {
        self.serialize(&inspection_value(inspection)?)
    }
}

impl Default for YamlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputFormatter for YamlFormatter {
    async fn format_report(&self, report: &ErrorReport) -> Result<String> {
        serde_yaml::to_string(&report_value(report)?).map_err(OutputError::YamlSerializationError)
    }

    async fn format_inspection(&self, inspection: &TemplateInspection) -> Result<String> {
        serde_yaml::to_string(&inspection_value(inspection)?)
            .map_err(OutputError::YamlSerializationError)
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputFormatter for TextFormatter {
    async fn format_report(&self, report: &ErrorReport) -> Result<String> {
        Ok(report.to_string())
    }

    async fn format_inspection(&self, inspection: &TemplateInspection) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Parts: {}\n", inspection.parts.join(", ")));
        output.push_str(&format!(
            "Placeholders: {}\n",
            inspection.placeholders.len()
        ));

        for placeholder in &inspection.placeholders {
            let marker = match placeholder.kind {
                PlaceholderKind::Field => "",
                PlaceholderKind::Section => "#",
                PlaceholderKind::InvertedSection => "^",
            };
            output.push_str(&format!(
                "  {{{{{}{}}}}}  {} paragraph {}\n",
                marker, placeholder.name, placeholder.part, placeholder.paragraph
            ));
        }

        if inspection.is_valid() {
            output.push_str("No placeholder errors found.");
        } else {
            output.push('\n');
            output.push_str(&inspection.errors.to_string());
        }

        Ok(output)
    }
}
