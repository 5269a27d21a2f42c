// ABOUTME: Lookup scopes used while resolving placeholders
// ABOUTME: Loop items open a child scope that falls back to the enclosing scopes

use tracing::trace;

use crate::fields::{NormalizedFields, NormalizedValue};

/// A chain of normalized mappings, innermost first.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    fields: &'a NormalizedFields,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn root(fields: &'a NormalizedFields) -> Self {
        Self {
            fields,
            parent: None,
        }
    }

    /// Scope for one loop item.
    pub fn child<'b>(&'b self, fields: &'b NormalizedFields) -> Scope<'b> {
        Scope {
            fields,
            parent: Some(self),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a NormalizedValue> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.fields.get(name) {
                return Some(value);
            }
            scope = current.parent;
        }
        None
    }

    /// Text for a field placeholder. Absent names and list values render empty.
    pub fn resolve_text(&self, name: &str) -> &'a str {
        match self.lookup(name) {
            Some(NormalizedValue::Text(text)) => text,
            Some(NormalizedValue::List(_)) => {
                trace!("Field {} holds a list; rendering it as empty text", name);
                ""
            }
            None => {
                trace!("Field {} is not supplied; rendering it as empty text", name);
                ""
            }
        }
    }

    /// Whether a section over `name` renders at least once.
    pub fn is_truthy(&self, name: &str) -> bool {
        match self.lookup(name) {
            Some(NormalizedValue::Text(text)) => !text.is_empty(),
            Some(NormalizedValue::List(items)) => !items.is_empty(),
            None => false,
        }
    }
}
