//! Field extraction for inbound string-keyed payloads.
//!
//! Inbound messages are parsed through these helpers instead of derived
//! deserializers so that an absent field and a wrongly shaped field map
//! precisely onto [`Error::MissingField`] and [`Error::TypeMismatch`].

use serde_json::Value;

use crate::{Error, Result};

/// Extracts a required string field.
pub fn str_field<'a>(value: &'a Value, name: &'static str) -> Result<&'a str> {
    match value.get(name) {
        None | Some(Value::Null) => Err(Error::MissingField(name)),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(Error::TypeMismatch(name)),
    }
}

/// Extracts an optional string field; absent and `null` read as `None`.
pub fn opt_str_field(value: &Value, name: &'static str) -> Result<Option<String>> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(Error::TypeMismatch(name)),
    }
}

/// Extracts a required non-negative integer field.
pub fn u64_field(value: &Value, name: &'static str) -> Result<u64> {
    match value.get(name) {
        None | Some(Value::Null) => Err(Error::MissingField(name)),
        Some(field) => field.as_u64().ok_or(Error::TypeMismatch(name)),
    }
}

/// Extracts an optional non-negative integer field.
pub fn opt_u64_field(value: &Value, name: &'static str) -> Result<Option<u64>> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(field) => field.as_u64().map(Some).ok_or(Error::TypeMismatch(name)),
    }
}

/// Extracts a boolean field, defaulting when absent.
pub fn bool_field_or(value: &Value, name: &'static str, default: bool) -> Result<bool> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(Error::TypeMismatch(name)),
    }
}

/// Extracts a required list-of-strings field.
pub fn str_list_field(value: &Value, name: &'static str) -> Result<Vec<String>> {
    let list = match value.get(name) {
        None | Some(Value::Null) => return Err(Error::MissingField(name)),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Error::TypeMismatch(name)),
    };

    list.iter()
        .map(|item| match item {
            Value::String(text) => Ok(text.clone()),
            _ => Err(Error::TypeMismatch(name)),
        })
        .collect()
}

/// Extracts a required nested object field.
pub fn object_field<'a>(value: &'a Value, name: &'static str) -> Result<&'a Value> {
    match value.get(name) {
        None | Some(Value::Null) => Err(Error::MissingField(name)),
        Some(field @ Value::Object(_)) => Ok(field),
        Some(_) => Err(Error::TypeMismatch(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_mismatched_fields_are_distinguished() {
        let value = json!({ "present": "text", "wrong": 7 });

        assert_eq!(str_field(&value, "present").unwrap(), "text");
        assert!(matches!(
            str_field(&value, "absent"),
            Err(Error::MissingField("absent"))
        ));
        assert!(matches!(
            str_field(&value, "wrong"),
            Err(Error::TypeMismatch("wrong"))
        ));
    }

    #[test]
    fn null_reads_as_absent() {
        let value = json!({ "field": null });
        assert!(matches!(
            u64_field(&value, "field"),
            Err(Error::MissingField("field"))
        ));
        assert_eq!(opt_str_field(&value, "field").unwrap(), None);
    }

    #[test]
    fn string_lists_must_be_uniform() {
        let value = json!({ "ok": ["a", "b"], "mixed": ["a", 1] });
        assert_eq!(str_list_field(&value, "ok").unwrap(), vec!["a", "b"]);
        assert!(matches!(
            str_list_field(&value, "mixed"),
            Err(Error::TypeMismatch("mixed"))
        ));
    }
}
