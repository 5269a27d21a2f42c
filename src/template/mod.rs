// ABOUTME: Template module for merging field data into document packages
// ABOUTME: Provides placeholder scanning, loop planning, rendering and error reporting

pub mod context;
pub mod engine;
pub mod error;
pub mod plan;
pub mod result;
pub mod scanner;

pub use context::Scope;
pub use engine::{render_blocking, RenderOptions, TemplateEngine};
pub use error::{ErrorReport, RenderFailure, Result, TemplateSyntaxError, RETYPE_GUIDANCE};
pub use result::{
    suggested_filename, GeneratedDocument, Placeholder, PlaceholderKind, RenderResult,
    RenderStage, TemplateInspection,
};
pub use scanner::{CLOSE_DELIMITER, OPEN_DELIMITER};
