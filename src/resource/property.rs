//! Resource property values.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Signature key marking an object as a special engine value.
pub const SIG_KEY: &str = "4dabf18193072939515e22adb298388d";
/// Signature of a secret value.
pub const SECRET_SIG: &str = "1b47061264138c4ac30d75fd1eb44270";
/// Signature of an output value.
pub const OUTPUT_SIG: &str = "d0e6a833031e9bbcd3f4e8bde6ca49a4";
/// Sentinel string standing in for a value that is not yet known.
pub const UNKNOWN_SENTINEL: &str = "04da6b54-80e4-46f7-96ec-b56ff0331ba9";

/// PropertyKey names a property within an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey(String);

impl PropertyKey {
    /// Creates a new PropertyKey.
    pub fn new(key: impl Into<String>) -> Self {
        PropertyKey(key.into())
    }

    /// Returns the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey(s)
    }
}

impl Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PropertyMap maps property keys to values.
pub type PropertyMap = BTreeMap<PropertyKey, PropertyValue>;

/// PropertyValue is a single node in a resource property tree.
///
/// `Computed`, `Output` and `Secret` are opaque: they carry nothing that
/// can be inspected, and descending into them yields the marker itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum PropertyValue {
    /// Null, and also the representation of an absent property.
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
    Computed,
    Output,
    Secret,
}

impl PropertyValue {
    /// Wraps a property map as an object value.
    pub fn object(map: PropertyMap) -> Self {
        PropertyValue::Object(map)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, PropertyValue::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, PropertyValue::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, PropertyValue::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PropertyValue::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, PropertyValue::Object(_))
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, PropertyValue::Computed)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, PropertyValue::Output)
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, PropertyValue::Secret)
    }

    /// Returns true for values whose contents must not be decomposed.
    pub fn is_opaque(&self) -> bool {
        self.is_computed() || self.is_output() || self.is_secret()
    }

    pub fn as_array(&self) -> Option<&Vec<PropertyValue>> {
        match self {
            PropertyValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&PropertyMap> {
        match self {
            PropertyValue::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Returns a short name for the kind of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Number(_) => "number",
            PropertyValue::String(_) => "string",
            PropertyValue::Array(_) => "array",
            PropertyValue::Object(_) => "object",
            PropertyValue::Computed => "computed",
            PropertyValue::Output => "output",
            PropertyValue::Secret => "secret",
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n as f64)
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

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(a: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(a)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(m: PropertyMap) -> Self {
        PropertyValue::Object(m)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match v {
            Json::Null => PropertyValue::Null,
            Json::Bool(b) => PropertyValue::Bool(b),
            Json::Number(n) => n.as_f64().map_or(PropertyValue::Null, PropertyValue::Number),
            Json::String(s) if s == UNKNOWN_SENTINEL => PropertyValue::Computed,
            Json::String(s) => PropertyValue::String(s),
            Json::Array(a) => PropertyValue::Array(a.into_iter().map(PropertyValue::from).collect()),
            Json::Object(m) => {
                // The payload beside a signature is dropped unread.
                match m.get(SIG_KEY).and_then(|s| s.as_str()) {
                    Some(SECRET_SIG) => return PropertyValue::Secret,
                    Some(OUTPUT_SIG) => return PropertyValue::Output,
                    _ => {}
                }
                PropertyValue::Object(
                    m.into_iter()
                        .map(|(k, v)| (PropertyKey(k), PropertyValue::from(v)))
                        .collect(),
                )
            }
        }
    }
}

impl From<PropertyValue> for serde_json::Value {
    fn from(v: PropertyValue) -> Self {
        use serde_json::Value as Json;

        fn signed(sig: &str) -> Json {
            let mut m = serde_json::Map::new();
            m.insert(SIG_KEY.to_string(), Json::String(sig.to_string()));
            Json::Object(m)
        }

        match v {
            PropertyValue::Null => Json::Null,
            PropertyValue::Bool(b) => Json::Bool(b),
            PropertyValue::Number(n) => serde_json::Number::from_f64(n).map_or(Json::Null, Json::Number),
            PropertyValue::String(s) => Json::String(s),
            PropertyValue::Array(a) => Json::Array(a.into_iter().map(Json::from).collect()),
            PropertyValue::Object(m) => {
                Json::Object(m.into_iter().map(|(k, v)| (k.0, Json::from(v))).collect())
            }
            PropertyValue::Computed => Json::String(UNKNOWN_SENTINEL.to_string()),
            PropertyValue::Output => signed(OUTPUT_SIG),
            PropertyValue::Secret => signed(SECRET_SIG),
        }
    }
}

/// Parse a property value from JSON.
pub fn from_json(json: &str) -> Result<PropertyValue, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a property value to JSON.
pub fn to_json(value: &PropertyValue) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
