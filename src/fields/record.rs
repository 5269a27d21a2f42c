// ABOUTME: Data record types holding caller-supplied field values
// ABOUTME: Builds records from query strings, key=value assignments, and JSON documents

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use super::error::{FieldError, Result};

/// A value supplied for one field.
///
/// Query-string data only ever produces `Text`. `List` feeds loop sections.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<DataRecord>),
}

/// Field name to value, in the order the fields were received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRecord {
    fields: IndexMap<String, FieldValue>,
}

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. Re-inserting a key replaces its value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Merge another record into this one; its values win.
    pub fn extend(&mut self, other: DataRecord) {
        self.fields.extend(other.fields);
    }

    /// Parse a url-encoded query string such as `firstName=Ada&email=`.
    ///
    /// A parameter with no value maps to the empty string.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Parse `key=value` assignments as given on the command line.
    pub fn from_assignments(assignments: &[String]) -> Result<Self> {
        let mut record = Self::new();
        for assignment in assignments {
            match assignment.split_once('=') {
                Some((key, value)) if !key.is_empty() => record.insert(key, value),
                _ => return Err(FieldError::InvalidAssignment(assignment.clone())),
            }
        }
        Ok(record)
    }

    /// Parse a JSON object. Scalars become text; arrays of objects become lists.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(content)?;
        Self::from_json_value(&value)
    }

    fn from_json_value(value: &JsonValue) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| FieldError::NotAnObject(json_kind(value).to_string()))?;

        let mut record = Self::new();
        for (key, value) in object {
            record.insert(key.clone(), field_from_json(key, value)?);
        }
        Ok(record)
    }
}

fn field_from_json(key: &str, value: &JsonValue) -> Result<FieldValue> {
    match value {
        JsonValue::String(s) => Ok(FieldValue::Text(s.clone())),
        JsonValue::Null => Ok(FieldValue::Text(String::new())),
        JsonValue::Bool(b) => Ok(FieldValue::Text(b.to_string())),
        JsonValue::Number(n) => Ok(FieldValue::Text(n.to_string())),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                DataRecord::from_json_value(item).map_err(|_| FieldError::UnsupportedValue {
                    key: key.to_string(),
                    reason: format!("list items must be objects, found {}", json_kind(item)),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(FieldValue::List),
        JsonValue::Object(_) => Err(FieldError::UnsupportedValue {
            key: key.to_string(),
            reason: "nested objects are not supported".to_string(),
        }),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<DataRecord>> for FieldValue {
    fn from(items: Vec<DataRecord>) -> Self {
        FieldValue::List(items)
    }
}

impl<K, V> FromIterator<(K, V)> for DataRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let record = DataRecord::from_query("?firstName=Ada&lastName=Lovelace&email=");

        assert_eq!(record.len(), 3);
        assert_eq!(record.get("firstName"), Some(&FieldValue::from("Ada")));
        assert_eq!(record.get("email"), Some(&FieldValue::from("")));
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, ["firstName", "lastName", "email"]);
    }

    #[test]
    fn test_from_query_decodes_and_defaults_missing_values() {
        let record = DataRecord::from_query("note=two%20words+here&flag");
        assert_eq!(
            record.get("note"),
            Some(&FieldValue::from("two words here"))
        );
        assert_eq!(record.get("flag"), Some(&FieldValue::from("")));
    }

    #[test]
    fn test_from_assignments() {
        let assignments = vec!["city=Paris".to_string(), "expr=a=b".to_string()];
        let record = DataRecord::from_assignments(&assignments).unwrap();
        assert_eq!(record.get("city"), Some(&FieldValue::from("Paris")));
        assert_eq!(record.get("expr"), Some(&FieldValue::from("a=b")));

        assert!(DataRecord::from_assignments(&["novalue".to_string()]).is_err());
        assert!(DataRecord::from_assignments(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_from_json() {
        let record = DataRecord::from_json(
            r#"{"name": "Ada", "age": 36, "items": [{"title": "Notes"}, {"title": "Engine"}]}"#,
        )
        .unwrap();

        assert_eq!(record.get("age"), Some(&FieldValue::from("36")));
        match record.get("items") {
            Some(FieldValue::List(items)) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1].get("title"), Some(&FieldValue::from("Engine")));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_unsupported_shapes() {
        assert!(matches!(
            DataRecord::from_json("[1, 2]"),
            Err(FieldError::NotAnObject(_))
        ));
        assert!(matches!(
            DataRecord::from_json(r#"{"a": {"b": "c"}}"#),
            Err(FieldError::UnsupportedValue { .. })
        ));
        assert!(matches!(
            DataRecord::from_json(r#"{"a": ["x"]}"#),
            Err(FieldError::UnsupportedValue { .. })
        ));
    }
}
