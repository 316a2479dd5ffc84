//! # Dynamic Values
//!
//! The values the checker classifies. They follow the JavaScript data
//! model rather than JSON's: `undefined` is distinct from `null`, and an
//! object may hold a property whose value is explicitly `undefined`
//! (present-as-undefined), which is not the same as the property being
//! missing altogether.
//!
//! Object properties keep insertion order so that diagnostics for extra
//! properties come out in the order the value lists them.
//!
//! ## Loading
//!
//! JSON and YAML documents convert losslessly into [`Value`], except that
//! YAML can express things JSON cannot (non-string keys, infinities),
//! which are rejected with a [`ValueLoadError`].

use indexmap::IndexMap;

use crate::error::ValueLoadError;

/// Ordered property map of an object value.
pub type Map = IndexMap<String, Value>;

/// A dynamic value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The `undefined` value.
    Undefined,
    /// The `null` value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. Integers and floats share one representation.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// A record with ordered, string-keyed properties.
    Object(Map),
    /// A host value of a kind the checker carries but cannot describe
    /// (functions, symbols, native handles). The string names the kind.
    Opaque(String),
}

impl Value {
    /// Build an object value from `(key, value)` pairs, keeping their order.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Parse a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, ValueLoadError> {
        let json: serde_json::Value = serde_json::from_str(input)?;
        Ok(json.into())
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(input: &str) -> Result<Self, ValueLoadError> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(input)?;
        Self::try_from(yaml)
    }

    /// True for `undefined` and `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the property map if this is an object.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the number if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Object(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            // Without arbitrary_precision every JSON number has an f64 form.
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = ValueLoadError;

    fn try_from(yaml: serde_yaml::Value) -> Result<Self, Self::Error> {
        match yaml {
            serde_yaml::Value::Null => Ok(Self::Null),
            serde_yaml::Value::Bool(b) => Ok(Self::Bool(b)),
            serde_yaml::Value::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => Ok(Self::Number(f)),
                _ => Err(ValueLoadError::UnrepresentableNumber(n.to_string())),
            },
            serde_yaml::Value::String(s) => Ok(Self::String(s)),
            serde_yaml::Value::Sequence(seq) => seq
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Array),
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = Map::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let key = match k {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => return Err(ValueLoadError::UnsupportedKey(format!("{other:?}"))),
                    };
                    map.insert(key, Self::try_from(v)?);
                }
                Ok(Self::Object(map))
            }
            // Tags carry no meaning for structural checks.
            serde_yaml::Value::Tagged(tagged) => Self::try_from(tagged.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_conversion_keeps_property_order() {
        let value = Value::from(json!({"zeta": 1, "alpha": "a", "mid": [true, null]}));
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(
            value.as_object().unwrap()["mid"],
            Value::Array(vec![Value::Bool(true), Value::Null])
        );
    }

    #[test]
    fn test_json_numbers_become_doubles() {
        assert_eq!(Value::from(json!(42)), Value::Number(42.0));
        assert_eq!(Value::from(json!(-1.5)), Value::Number(-1.5));
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(matches!(
            Value::from_json_str("{not json"),
            Err(ValueLoadError::Json(_))
        ));
    }

    #[test]
    fn test_yaml_to_value_conversion() {
        let value = Value::from_yaml_str(
            r#"
name: widget
version: "1.0.0"
count: 42
enabled: true
items:
  - one
  - two
"#,
        )
        .unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map["name"], Value::from("widget"));
        assert_eq!(map["version"], Value::from("1.0.0"));
        assert_eq!(map["count"], Value::Number(42.0));
        assert_eq!(map["enabled"], Value::Bool(true));
        assert_eq!(map["items"].as_array().unwrap()[0], Value::from("one"));
    }

    #[test]
    fn test_yaml_numeric_keys_are_stringified() {
        let value = Value::from_yaml_str("1: one\ntrue: yes\n").unwrap();
        let map = value.as_object().unwrap();
        assert!(map.contains_key("1"));
        assert!(map.contains_key("true"));
    }

    #[test]
    fn test_yaml_infinity_rejected() {
        let err = Value::from_yaml_str("x: .inf").unwrap_err();
        assert!(matches!(err, ValueLoadError::UnrepresentableNumber(_)));
    }

    #[test]
    fn test_yaml_sequence_key_rejected() {
        let err = Value::from_yaml_str("? [1, 2]\n: x\n").unwrap_err();
        assert!(matches!(err, ValueLoadError::UnsupportedKey(_)));
    }

    #[test]
    fn test_object_helper_keeps_explicit_undefined() {
        let value = Value::object([("a", Value::Undefined), ("b", Value::from(1))]);
        let map = value.as_object().unwrap();
        assert_eq!(map.get("a"), Some(&Value::Undefined));
        assert_eq!(map.get("missing"), None);
    }
}
