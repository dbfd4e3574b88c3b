//! Declarative property model
//!
//! Lifecycle requests carry [`PropertyValue`]s rather than raw JSON so that
//! secret and unknown markers survive the trip through the translator. They
//! are only stripped when a value is put on the wire.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Properties of a resource keyed by name
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A single declarative property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),

    /// A value that must not be displayed or persisted in plain text
    Secret(Box<PropertyValue>),

    /// A value that is not known until the resource exists
    Unknown,
}

impl PropertyValue {
    /// Wrap a value as a secret (no-op when it already is one)
    pub fn secret(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Secret(_) => value,
            other => PropertyValue::Secret(Box::new(other)),
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, PropertyValue::Secret(_))
    }

    /// Null and unknown values are left out of request bodies
    pub fn is_absent(&self) -> bool {
        matches!(self, PropertyValue::Null | PropertyValue::Unknown)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            PropertyValue::Secret(inner) => inner.as_str(),
            _ => None,
        }
    }

    /// Convert a decoded JSON value
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => PropertyValue::Number(n),
            Value::String(s) => PropertyValue::String(s),
            Value::Array(items) => {
                PropertyValue::Array(items.into_iter().map(PropertyValue::from_json).collect())
            }
            Value::Object(fields) => PropertyValue::Object(map_from_object(fields)),
        }
    }

    /// Wire form of the value
    ///
    /// Secrets are unwrapped. Null and unknown object members are dropped;
    /// inside arrays they become JSON `null` so positions are kept.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null | PropertyValue::Unknown => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Number(n) => Value::Number(n.clone()),
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Array(items) => {
                Value::Array(items.iter().map(PropertyValue::to_json).collect())
            }
            PropertyValue::Object(fields) => map_to_json(fields),
            PropertyValue::Secret(inner) => inner.to_json(),
        }
    }

    /// Display form of the value with secrets masked
    pub fn to_redacted_json(&self) -> Value {
        match self {
            PropertyValue::Secret(_) => Value::String("[secret]".to_string()),
            PropertyValue::Unknown => Value::String("[unknown]".to_string()),
            PropertyValue::Array(items) => {
                Value::Array(items.iter().map(PropertyValue::to_redacted_json).collect())
            }
            PropertyValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_redacted_json()))
                    .collect(),
            ),
            other => other.to_json(),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n.into())
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        PropertyValue::from_json(value)
    }
}

fn map_from_object(fields: Map<String, Value>) -> PropertyMap {
    fields
        .into_iter()
        .map(|(k, v)| (k, PropertyValue::from_json(v)))
        .collect()
}

/// Decode a JSON object into a property map
///
/// Returns `None` when `value` is not an object.
pub fn map_from_json(value: Value) -> Option<PropertyMap> {
    match value {
        Value::Object(fields) => Some(map_from_object(fields)),
        _ => None,
    }
}

/// Encode a property map as a JSON object, omitting null and unknown members
pub fn map_to_json(map: &PropertyMap) -> Value {
    Value::Object(
        map.iter()
            .filter(|(_, v)| !v.is_absent())
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect(),
    )
}

/// Display form of a property map with secrets masked
pub fn map_to_redacted_json(map: &PropertyMap) -> Value {
    PropertyValue::Object(map.clone()).to_redacted_json()
}

/// Re-mark values as secret where the prior properties held a secret
///
/// Freshly decoded values never carry markers, so secrecy has to be carried
/// over from what the caller already knows about the resource.
pub fn carry_secrets(outputs: PropertyMap, prior: &PropertyMap) -> PropertyMap {
    outputs
        .into_iter()
        .map(|(key, value)| {
            let secret = prior.get(&key).is_some_and(PropertyValue::is_secret);
            let value = if secret {
                PropertyValue::secret(value)
            } else {
                value
            };
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_and_unknowns_omitted() {
        let mut map = PropertyMap::new();
        map.insert("title".to_string(), "buy milk".into());
        map.insert("order".to_string(), PropertyValue::Null);
        map.insert("url".to_string(), PropertyValue::Unknown);

        assert_eq!(map_to_json(&map), json!({"title": "buy milk"}));
    }

    #[test]
    fn test_secrets_unwrapped_on_wire() {
        let mut map = PropertyMap::new();
        map.insert(
            "token".to_string(),
            PropertyValue::secret("hunter2".into()),
        );
        assert_eq!(map_to_json(&map), json!({"token": "hunter2"}));
        assert_eq!(map_to_redacted_json(&map), json!({"token": "[secret]"}));
    }

    #[test]
    fn test_nested_values() {
        let value = PropertyValue::from_json(json!({
            "tags": ["a", null],
            "owner": {"name": "sam", "team": null}
        }));
        assert_eq!(
            value.to_json(),
            json!({"tags": ["a", null], "owner": {"name": "sam"}})
        );
    }

    #[test]
    fn test_map_from_json_requires_object() {
        assert!(map_from_json(json!({"a": 1})).is_some());
        assert!(map_from_json(json!([1, 2])).is_none());
        assert!(map_from_json(Value::Null).is_none());
    }

    #[test]
    fn test_secret_not_double_wrapped() {
        let once = PropertyValue::secret("x".into());
        let twice = PropertyValue::secret(once.clone());
        assert_eq!(once, twice);
        assert_eq!(twice.as_str(), Some("x"));
    }

    #[test]
    fn test_carry_secrets() {
        let mut prior = PropertyMap::new();
        prior.insert("password".to_string(), PropertyValue::secret("old".into()));
        prior.insert("title".to_string(), "old".into());

        let mut outputs = PropertyMap::new();
        outputs.insert("password".to_string(), "new".into());
        outputs.insert("title".to_string(), "new".into());
        outputs.insert("url".to_string(), "http://x/1".into());

        let outputs = carry_secrets(outputs, &prior);
        assert!(outputs["password"].is_secret());
        assert!(!outputs["title"].is_secret());
        assert!(!outputs["url"].is_secret());
    }
}
