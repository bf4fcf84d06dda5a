//! Wire format of the document store's REST interface.
//!
//! Every value inside a document arrives wrapped in a single-slot object
//! such as `{"stringValue": "hello"}` or `{"integerValue": "42"}`. The types
//! here mirror that shape one-to-one so `serde` can read a list response
//! without any custom parsing, and [`decode`] flattens a document into a
//! [`Record`] of native values.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::record::{FieldValue, Record};

/// Body of a list-documents response. A collection with no documents is
/// answered with `{}`, so the list defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<WireDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, WireField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

/// One typed value. Well-formed input populates exactly one slot; slots the
/// decoder does not know about (`nullValue`, `referenceValue`, ...) are
/// ignored by `serde` and leave every slot empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(
        default,
        deserialize_with = "integer_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub integer_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_value: Option<WireArray>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_value: Option<WireMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireArray {
    #[serde(default)]
    pub values: Vec<WireField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireMap {
    #[serde(default)]
    pub fields: BTreeMap<String, WireField>,
}

impl WireField {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn integer(value: impl Into<String>) -> Self {
        Self {
            integer_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Self::default()
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            boolean_value: Some(value),
            ..Self::default()
        }
    }

    pub fn timestamp(value: impl Into<String>) -> Self {
        Self {
            timestamp_value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn array(values: Vec<WireField>) -> Self {
        Self {
            array_value: Some(WireArray { values }),
            ..Self::default()
        }
    }

    pub fn map(fields: BTreeMap<String, WireField>) -> Self {
        Self {
            map_value: Some(WireMap { fields }),
            ..Self::default()
        }
    }

    /// Decode the first populated slot, checked in the order string,
    /// integer, double, boolean, timestamp, array, map. Returns `None` when
    /// no slot is populated.
    pub fn decode(&self) -> Option<FieldValue> {
        if let Some(value) = &self.string_value {
            return Some(FieldValue::String(value.clone()));
        }
        if let Some(value) = &self.integer_value {
            return Some(parse_integer(value));
        }
        if let Some(value) = self.double_value {
            return Some(FieldValue::Double(value));
        }
        if let Some(value) = self.boolean_value {
            return Some(FieldValue::Boolean(value));
        }
        if let Some(value) = &self.timestamp_value {
            return Some(FieldValue::String(value.clone()));
        }
        if let Some(array) = &self.array_value {
            // Array items stay in wire form; callers decode items they read.
            return Some(FieldValue::Array(array.values.clone()));
        }
        if let Some(map) = &self.map_value {
            return Some(FieldValue::Map(decode_fields(&map.fields)));
        }
        None
    }
}

/// Flatten a wire document into a record of native values.
pub fn decode(document: &WireDocument) -> Record {
    decode_fields(&document.fields)
}

fn decode_fields(fields: &BTreeMap<String, WireField>) -> Record {
    fields
        .iter()
        .filter_map(|(key, field)| field.decode().map(|value| (key.clone(), value)))
        .collect()
}

/// Leading-digit integer parse: optional sign, then as many decimal digits
/// as are present. Text without leading digits becomes NaN.
fn parse_integer(text: &str) -> FieldValue {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() {
        return FieldValue::Double(f64::NAN);
    }

    match digits.parse::<i64>() {
        Ok(value) if negative => FieldValue::Integer(-value),
        Ok(value) => FieldValue::Integer(value),
        Err(_) => {
            let magnitude = digits.parse::<f64>().unwrap_or(f64::NAN);
            FieldValue::Double(if negative { -magnitude } else { magnitude })
        }
    }
}

fn integer_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(fields: JsonValue) -> WireDocument {
        serde_json::from_value(json!({ "fields": fields })).expect("wire document")
    }

    #[test]
    fn decodes_scalar_slots() {
        let record = decode(&document(json!({
            "title": { "stringValue": "Launch" },
            "priority": { "integerValue": "3" },
            "ratio": { "doubleValue": 0.5 },
            "featured": { "booleanValue": true },
            "date": { "timestampValue": "2024-06-05T10:00:00Z" },
        })));

        assert_eq!(record.get("title"), Some(&FieldValue::String("Launch".into())));
        assert_eq!(record.get("priority"), Some(&FieldValue::Integer(3)));
        assert_eq!(record.get("ratio"), Some(&FieldValue::Double(0.5)));
        assert_eq!(record.get("featured"), Some(&FieldValue::Boolean(true)));
        assert_eq!(
            record.get("date"),
            Some(&FieldValue::String("2024-06-05T10:00:00Z".into()))
        );
    }

    #[test]
    fn string_slot_wins_over_integer_slot() {
        let record = decode(&document(json!({
            "mixed": { "stringValue": "text", "integerValue": "7" },
        })));

        assert_eq!(record.get("mixed"), Some(&FieldValue::String("text".into())));
    }

    #[test]
    fn nested_maps_are_decoded_recursively() {
        let record = decode(&document(json!({
            "a": { "mapValue": { "fields": { "b": { "stringValue": "x" } } } },
        })));

        let inner: Record = [("b".to_string(), FieldValue::String("x".into()))]
            .into_iter()
            .collect();
        assert_eq!(record.get("a"), Some(&FieldValue::Map(inner)));
    }

    #[test]
    fn arrays_keep_raw_wire_items() {
        let record = decode(&document(json!({
            "tags": { "arrayValue": { "values": [
                { "stringValue": "rust" },
                { "integerValue": "2" }
            ] } },
        })));

        assert_eq!(
            record.get("tags"),
            Some(&FieldValue::Array(vec![
                WireField::string("rust"),
                WireField::integer("2"),
            ]))
        );
    }

    #[test]
    fn empty_array_and_map_values_decode_to_empty_containers() {
        let record = decode(&document(json!({
            "list": { "arrayValue": {} },
            "nested": { "mapValue": {} },
        })));

        assert_eq!(record.get("list"), Some(&FieldValue::Array(Vec::new())));
        assert_eq!(record.get("nested"), Some(&FieldValue::Map(Record::default())));
    }

    #[test]
    fn fields_without_known_slots_are_skipped() {
        let record = decode(&document(json!({
            "missing": {},
            "null": { "nullValue": null },
            "kept": { "booleanValue": false },
        })));

        assert_eq!(record.len(), 1);
        assert!(record.get("missing").is_none());
        assert!(record.get("null").is_none());
    }

    #[test]
    fn integer_text_follows_leading_digit_rules() {
        assert_eq!(parse_integer("42"), FieldValue::Integer(42));
        assert_eq!(parse_integer("-17"), FieldValue::Integer(-17));
        assert_eq!(parse_integer("  12abc"), FieldValue::Integer(12));
        assert!(matches!(parse_integer("abc"), FieldValue::Double(v) if v.is_nan()));
        assert!(matches!(parse_integer(""), FieldValue::Double(v) if v.is_nan()));
    }

    #[test]
    fn integer_values_sent_as_json_numbers_are_accepted() {
        let record = decode(&document(json!({
            "priority": { "integerValue": 5 },
        })));

        assert_eq!(record.get("priority"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn list_response_without_documents_is_empty() {
        let response: ListDocumentsResponse = serde_json::from_str("{}").expect("response");
        assert!(response.documents.is_empty());
    }
}
