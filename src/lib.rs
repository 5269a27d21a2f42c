// ABOUTME: Main library module for docmerge, a Word template renderer
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod fields;
pub mod output;
pub mod package;
pub mod source;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use fields::{key_variants, normalize, DataRecord, FieldNormalizer, NormalizedFields};
pub use output::OutputHandler;
pub use package::{ArchiveError, TemplateArchive};
pub use source::{TemplateLoader, TemplateLocation, TemplateSource};
pub use template::{
    ErrorReport, GeneratedDocument, RenderFailure, RenderOptions, RenderResult, TemplateEngine,
};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
