// ABOUTME: Field-key normalization module for convention-agnostic placeholder matching
// ABOUTME: Exports data records, key variant generation, and the normalized field mapping

pub mod error;
pub mod normalizer;
pub mod record;
pub mod variants;

pub use error::{FieldError, Result};
pub use normalizer::{normalize, FieldNormalizer, NormalizedFields, NormalizedValue};
pub use record::{DataRecord, FieldValue};
pub use variants::key_variants;
