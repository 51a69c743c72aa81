//! Purpose: Checked access to raw field maps plus the structural field-mapper.
//! Exports: `Fields`, `value_kind`, `str_field`, `optional_str`, `take_object`, `take_array`,
//!   `into_object`, `map_fields`.
//! Role: The only place that inspects the dynamic tree; everything else asks through here.
//! Invariants: `null` reads as absent; a present value of the wrong type is an error, never a cast.
//! Invariants: `map_fields` ignores unknown keys and leaves absent keys at their default.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::error::{Error, ErrorKind};

pub type Fields = Map<String, Value>;

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the value under `key` only when it is a string.
pub fn str_field<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Strict variant of [`str_field`]: absent or null is `None`, anything else but a string fails.
pub fn optional_str<'a>(fields: &'a Fields, key: &str) -> Result<Option<&'a str>, Error> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(malformed(key, "string", other)),
    }
}

pub fn take_object(fields: &mut Fields, key: &str) -> Result<Option<Fields>, Error> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(malformed(key, "object", &other)),
    }
}

pub fn take_array(fields: &mut Fields, key: &str) -> Result<Option<Vec<Value>>, Error> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(malformed(key, "array", &other)),
    }
}

pub fn into_object(value: Value) -> Result<Fields, Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::new(ErrorKind::MalformedElement)
            .with_message(format!("expected object, got {}", value_kind(&other)))),
    }
}

pub fn map_fields<T: DeserializeOwned>(fields: Fields) -> Result<T, Error> {
    serde_json::from_value(Value::Object(fields)).map_err(|err| {
        Error::new(ErrorKind::StructuralMappingFailed)
            .with_message(err.to_string())
            .with_source(err)
    })
}

fn malformed(key: &str, expected: &str, found: &Value) -> Error {
    Error::new(ErrorKind::MalformedElement)
        .with_message(format!("expected {expected}, got {}", value_kind(found)))
        .with_field(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
    #[serde(default, rename_all = "camelCase")]
    struct Sample {
        id: String,
        alt: Option<String>,
        width: Option<u32>,
        include_fields: Vec<String>,
    }

    fn fields(value: Value) -> Fields {
        into_object(value).expect("object")
    }

    #[test]
    fn map_fields_ignores_unknown_and_defaults_absent() {
        let sample: Sample = map_fields(fields(json!({
            "id": "gid://shopify/MediaImage/1",
            "width": 640,
            "somethingElse": {"nested": true}
        })))
        .expect("mapped");
        assert_eq!(sample.id, "gid://shopify/MediaImage/1");
        assert_eq!(sample.width, Some(640));
        assert_eq!(sample.alt, None);
        assert!(sample.include_fields.is_empty());
    }

    #[test]
    fn map_fields_rejects_untypeable_value() {
        let err = map_fields::<Sample>(fields(json!({"width": "wide"}))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralMappingFailed);
        assert!(err.message().is_some());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn mapped_known_fields_match_raw_input() {
        let raw = fields(json!({
            "id": "a",
            "alt": "b",
            "width": 3,
            "includeFields": ["x", "y"],
            "ignored": 1
        }));
        let sample: Sample = map_fields(raw.clone()).expect("mapped");
        let back = fields(serde_json::to_value(&sample).expect("serialize"));
        for (key, value) in &back {
            assert_eq!(raw.get(key), Some(value), "key {key}");
        }
        assert_eq!(back.len(), 4);
    }

    #[test]
    fn null_reads_as_absent() {
        let mut map = fields(json!({"a": null, "b": null, "c": null}));
        assert_eq!(optional_str(&map, "a").expect("null ok"), None);
        assert!(take_object(&mut map, "b").expect("null ok").is_none());
        assert!(take_array(&mut map, "c").expect("null ok").is_none());
        assert!(take_array(&mut map, "missing").expect("absent ok").is_none());
    }

    #[test]
    fn wrong_types_are_malformed_elements() {
        let mut map = fields(json!({"cursor": 7, "node": [], "edges": {}}));
        let err = optional_str(&map, "cursor").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedElement);
        assert_eq!(err.field(), Some("cursor"));
        assert_eq!(err.message(), Some("expected string, got number"));

        let err = take_object(&mut map, "node").unwrap_err();
        assert_eq!(err.message(), Some("expected object, got array"));
        let err = take_array(&mut map, "edges").unwrap_err();
        assert_eq!(err.message(), Some("expected array, got object"));

        let err = into_object(json!("scalar")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedElement);
    }

    #[test]
    fn str_field_skips_non_strings() {
        let map = fields(json!({"__typename": 1, "id": "x"}));
        assert_eq!(str_field(&map, "__typename"), None);
        assert_eq!(str_field(&map, "id"), Some("x"));
    }
}
