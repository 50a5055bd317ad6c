//! RPC-wire-ready value model.
//!
//! # Responsibilities
//! - Represent every value the RPC codec can encode
//! - Render values back to JSON for HTTP responses
//!
//! # Design Decisions
//! - Maps keep insertion order (`Vec` of pairs) so rendering is deterministic
//! - Typed objects carry their RPC class tag; the tag is dropped when rendered as JSON
//! - Binary nested inside a container renders as an array of byte values

use serde_json::{Map as JsonMap, Number, Value};

/// A typed value ready to hand to the RPC codec.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    List(Vec<TypedValue>),
    /// Untyped map (`java.util.Map` on the wire).
    Map(Vec<(TypedValue, TypedValue)>),
    /// Map encoded with an explicit RPC class tag.
    Object {
        class: String,
        fields: Vec<(String, TypedValue)>,
    },
}

impl TypedValue {
    /// Short name of the variant, used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::Boolean(_) => "boolean",
            TypedValue::Integer(_) => "integer",
            TypedValue::Long(_) => "long",
            TypedValue::Double(_) => "double",
            TypedValue::String(_) => "string",
            TypedValue::Binary(_) => "binary",
            TypedValue::List(_) => "list",
            TypedValue::Map(_) => "map",
            TypedValue::Object { .. } => "object",
        }
    }

    /// Render this value as a JSON document.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::Integer(i) => Value::from(*i),
            TypedValue::Long(l) => Value::from(*l),
            // Non-finite doubles have no JSON form
            TypedValue::Double(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Binary(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
            TypedValue::List(items) => Value::Array(items.iter().map(TypedValue::to_json).collect()),
            TypedValue::Map(entries) => {
                let mut object = JsonMap::with_capacity(entries.len());
                for (key, value) in entries {
                    object.insert(key.to_key_string(), value.to_json());
                }
                Value::Object(object)
            }
            TypedValue::Object { fields, .. } => {
                let mut object = JsonMap::with_capacity(fields.len());
                for (key, value) in fields {
                    object.insert(key.clone(), value.to_json());
                }
                Value::Object(object)
            }
        }
    }

    /// Serialize to compact JSON text.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    fn to_key_string(&self) -> String {
        match self {
            TypedValue::String(s) => s.clone(),
            other => other.to_json_string(),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}
