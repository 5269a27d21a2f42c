// ABOUTME: Field-key normalizer expanding a data record into every naming-convention spelling
// ABOUTME: Produces the lookup mapping consulted when resolving template placeholders

use std::collections::HashMap;
use tracing::debug;

use super::record::{DataRecord, FieldValue};
use super::variants::key_variants;

/// A resolved value in the normalized mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Text(String),
    List(Vec<NormalizedFields>),
}

/// Lookup table from every accepted spelling of a field to its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFields {
    entries: HashMap<String, NormalizedValue>,
}

impl NormalizedFields {
    pub fn get(&self, key: &str) -> Option<&NormalizedValue> {
        self.entries.get(key)
    }

    /// Text value for `key`, if the key is present and holds text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(NormalizedValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNormalizer;

impl FieldNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Expand `record` so that any spelling from [`key_variants`] resolves.
    ///
    /// When two keys produce the same spelling, a key supplied verbatim in the
    /// record always keeps its own value; otherwise the earlier key wins.
    pub fn normalize(&self, record: &DataRecord) -> NormalizedFields {
        let values: Vec<(&String, NormalizedValue)> = record
            .iter()
            .map(|(key, value)| (key, self.normalize_value(value)))
            .collect();

        let mut entries = HashMap::new();
        for (key, value) in &values {
            for variant in key_variants(key) {
                if variant != **key {
                    entries.entry(variant).or_insert_with(|| value.clone());
                }
            }
        }
        for (key, value) in values {
            entries.insert(key.clone(), value);
        }

        debug!(
            "Normalized {} fields into {} lookup keys",
            record.len(),
            entries.len()
        );

        NormalizedFields { entries }
    }

    fn normalize_value(&self, value: &FieldValue) -> NormalizedValue {
        match value {
            FieldValue::Text(text) => NormalizedValue::Text(text.clone()),
            FieldValue::List(items) => {
                NormalizedValue::List(items.iter().map(|item| self.normalize(item)).collect())
            }
        }
    }
}

/// Normalize a record with the default normalizer.
pub fn normalize(record: &DataRecord) -> NormalizedFields {
    FieldNormalizer::new().normalize(record)
}
