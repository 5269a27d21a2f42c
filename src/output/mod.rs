// ABOUTME: Output handler module for generated documents and template error reports
// ABOUTME: Formats reports as JSON/YAML/text and writes documents and reports to their destinations

pub mod config;
pub mod error;
pub mod formatter;
pub mod writer;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use self::config::{OutputConfig, OutputDestination};
use self::error::{OutputError, Result};
use self::formatter::{JsonFormatter, OutputFormatter, TextFormatter, YamlFormatter};
use self::writer::{ConsoleWriter, FileWriter, OutputWriter};
use crate::template::{ErrorReport, GeneratedDocument, TemplateInspection};

pub struct OutputHandler {
    formatters: HashMap<String, Box<dyn OutputFormatter>>,
    writers: HashMap<String, Box<dyn OutputWriter>>,
}

impl OutputHandler {
    pub fn new() -> Self {
        let mut handler = Self {
            formatters: HashMap::new(),
            writers: HashMap::new(),
        };

        handler.register_formatter("json", Box::new(JsonFormatter::new()));
        handler.register_formatter("pretty", Box::new(JsonFormatter::new_pretty()));
        handler.register_formatter("yaml", Box::new(YamlFormatter::new()));
        handler.register_formatter("text", Box::new(TextFormatter::new()));

        handler.register_writer("stdout", Box::new(ConsoleWriter::stdout()));
        handler.register_writer("stderr", Box::new(ConsoleWriter::stderr()));
        handler.register_writer("file", Box::new(FileWriter::new()));

        handler
    }

    pub fn register_formatter(&mut self, name: &str, formatter: Box<dyn OutputFormatter>) {
        self.formatters.insert(name.to_string(), formatter);
    }

    pub fn register_writer(&mut self, name: &str, writer: Box<dyn OutputWriter>) {
        self.writers.insert(name.to_string(), writer);
    }

    fn formatter(&self, format: &str) -> Result<&dyn OutputFormatter> {
        self.formatters
            .get(format)
            .map(|formatter| formatter.as_ref())
            .ok_or_else(|| OutputError::FormatterNotFound {
                format: format.to_string(),
            })
    }

    async fn write_to(&self, content: &[u8], destinations: &[OutputDestination]) -> Result<()> {
        for destination in destinations {
            let writer = self.writers.get(&destination.writer_type).ok_or_else(|| {
                OutputError::WriterNotFound {
                    writer_type: destination.writer_type.clone(),
                }
            })?;
            writer.write(content, destination).await?;
        }
        Ok(())
    }

    pub async fn format_report(&self, report: &ErrorReport, format: &str) -> Result<String> {
        self.formatter(format)?.format_report(report).await
    }

    /// Format a placeholder error report and deliver it to every report destination.
    pub async fn output_report(&self, report: &ErrorReport, config: &OutputConfig) -> Result<()> {
        let formatted = self.format_report(report, &config.report_format).await?;
        self.write_to(formatted.as_bytes(), &config.report_destinations)
            .await
    }

    /// Format an inspection and print it to stdout.
    pub async fn output_inspection(
        &self,
        inspection: &TemplateInspection,
        config: &OutputConfig,
    ) -> Result<()> {
        let formatted = self
            .formatter(&config.report_format)?
            .format_inspection(inspection)
            .await?;
        self.write_to(formatted.as_bytes(), &[OutputDestination::new_stdout()])
            .await
    }

    /// Write a generated document and return the path it was written to.
    pub async fn write_document(
        &self,
        document: &GeneratedDocument,
        config: &OutputConfig,
        explicit: Option<&Path>,
        template_stem: Option<&str>,
    ) -> Result<PathBuf> {
        let path = config.document_path(explicit, template_stem, document);
        let destination = OutputDestination::new_file(path.to_string_lossy())
            .with_option("create_dirs", config.create_dirs.into())
            .with_option("backup_existing", config.backup_existing.into());

        self.write_to(document.bytes(), &[destination]).await?;
        Ok(path)
    }

    pub fn list_formatters(&self) -> Vec<&str> {
        self.formatters.keys().map(|k| k.as_str()).collect()
    }

    pub fn list_writers(&self) -> Vec<&str> {
        self.writers.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
