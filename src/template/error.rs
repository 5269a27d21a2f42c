// ABOUTME: Error types for template rendering
// ABOUTME: Collects placeholder syntax errors into an ordered report and defines render failures

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::result::RenderStage;
use crate::package::ArchiveError;

/// Shown after the error list whenever placeholder errors are presented to a person.
pub const RETYPE_GUIDANCE: &str = "Open the template and retype each placeholder listed above \
without any formatting changes. Delete the old text completely and type it fresh.";

/// A placeholder that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSyntaxError {
    /// Archive part the token was found in, e.g. `word/header1.xml`.
    pub part: String,
    /// Raw token text as it appears in the paragraph.
    pub token: String,
    pub explanation: String,
    /// 1-based paragraph number within the part.
    pub paragraph: usize,
    /// 1-based character column within the paragraph text.
    pub column: usize,
}

impl fmt::Display for TemplateSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (in {}, paragraph {}, column {}): {}",
            self.explanation, self.part, self.paragraph, self.column, self.token
        )
    }
}

/// Every syntax error found in a template, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    errors: Vec<TemplateSyntaxError>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the errors of one part. Parts must be added in archive order.
    pub fn extend_part(&mut self, mut errors: Vec<TemplateSyntaxError>) {
        errors.sort_by_key(|error| (error.paragraph, error.column));
        self.errors.extend(errors);
    }

    pub fn errors(&self) -> &[TemplateSyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<TemplateSyntaxError> {
        self.errors
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateSyntaxError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Distinct part names that contain errors, in report order.
    pub fn parts(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !parts.contains(&error.part.as_str()) {
                parts.push(&error.part);
            }
        }
        parts
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Template Error:")?;
        writeln!(f)?;
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        writeln!(f)?;
        write!(f, "{}", RETYPE_GUIDANCE)
    }
}

#[derive(Error, Debug)]
pub enum RenderFailure {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Template contains {} placeholder error(s)", .0.len())]
    Template(ErrorReport),

    #[error("Render cancelled before the {0} stage")]
    Cancelled(RenderStage),

    #[error("Render worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl RenderFailure {
    /// The placeholder report, when the failure is a template error.
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            RenderFailure::Template(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RenderFailure::Cancelled(_))
    }
}

pub type Result<T> = std::result::Result<T, RenderFailure>;
