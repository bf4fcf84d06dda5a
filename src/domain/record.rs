//! Decoded, schema-less documents.

use std::collections::BTreeMap;

use serde::Serialize;

use super::normalize::tag_list;
use super::wire::WireField;

const TAG_FIELDS: [&str; 2] = ["tags", "platforms"];

/// Native value of one decoded field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Array(Vec<WireField>),
    Map(Record),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Numeric view of the value. Numeric strings count, so a `priority`
    /// stored as text still orders correctly.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Double(value) => Some(*value),
            FieldValue::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Scalar values rendered as text; arrays and maps have no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::String(value) => Some(value.clone()),
            FieldValue::Integer(value) => Some(value.to_string()),
            FieldValue::Double(value) => Some(value.to_string()),
            FieldValue::Boolean(value) => Some(value.to_string()),
            FieldValue::Array(_) | FieldValue::Map(_) => None,
        }
    }
}

/// A decoded document. No field is guaranteed to exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(FieldValue::to_text)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_f64)
    }

    /// First non-empty string among `keys`, in order.
    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.str_field(key))
            .find(|value| !value.trim().is_empty())
    }

    /// Tags carried by `tags` or, when that is absent or empty, `platforms`.
    /// A comma-separated string and an array of strings are both accepted.
    pub fn tags(&self) -> Vec<String> {
        TAG_FIELDS
            .iter()
            .filter_map(|key| self.get(key))
            .map(tag_values)
            .find(|tags| !tags.is_empty())
            .unwrap_or_default()
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn tag_values(value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::String(text) => tag_list(text),
        FieldValue::Array(items) => items
            .iter()
            .filter_map(WireField::decode)
            .filter_map(|item| item.to_text())
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, FieldValue)]) -> Record {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn tags_prefer_tags_over_platforms() {
        let rec = record(&[
            ("tags", FieldValue::String("web, cloud".into())),
            ("platforms", FieldValue::String("ios".into())),
        ]);
        assert_eq!(rec.tags(), vec!["web", "cloud"]);
    }

    #[test]
    fn tags_fall_back_to_platforms_when_tags_empty() {
        let rec = record(&[
            ("tags", FieldValue::String(" , ".into())),
            ("platforms", FieldValue::String("ios, android".into())),
        ]);
        assert_eq!(rec.tags(), vec!["ios", "android"]);
    }

    #[test]
    fn tags_read_array_items() {
        let rec = record(&[(
            "tags",
            FieldValue::Array(vec![
                WireField::string(" rust "),
                WireField::string(""),
                WireField::boolean(true),
            ]),
        )]);
        assert_eq!(rec.tags(), vec!["rust", "true"]);
    }

    #[test]
    fn first_str_skips_blank_values() {
        let rec = record(&[
            ("name", FieldValue::String("  ".into())),
            ("title", FieldValue::String("Atlas".into())),
        ]);
        assert_eq!(rec.first_str(&["name", "title"]), Some("Atlas"));
    }

    #[test]
    fn numbers_accept_numeric_text() {
        let rec = record(&[
            ("a", FieldValue::Integer(4)),
            ("b", FieldValue::String(" 2.5 ".into())),
            ("c", FieldValue::Boolean(true)),
        ]);
        assert_eq!(rec.number("a"), Some(4.0));
        assert_eq!(rec.number("b"), Some(2.5));
        assert_eq!(rec.number("c"), None);
    }
}
