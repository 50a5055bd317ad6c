//! JSON document to typed value conversion.
//!
//! # Responsibilities
//! - Recursively map arrays to lists and objects to maps
//! - Re-dispatch scalars into the text converter when a declared type has a rule
//! - Drop null-valued map entries on request
//!
//! # Design Decisions
//! - The declared type applies to the top-level value only; nested values
//!   are inferred from their JSON shape
//! - Objects declared as a concrete class become tagged objects; map-like or
//!   absent declarations become untyped maps
//! - Containers cannot satisfy a scalar declaration

use serde_json::{Number, Value};

use crate::bridge::convert;
use crate::bridge::error::{BridgeError, Result};
use crate::bridge::value::TypedValue;

/// Declared types that encode a JSON object as an untyped map.
const MAP_TYPES: [&str; 5] = [
    "",
    "java.util.Map",
    "java.util.HashMap",
    "java.util.LinkedHashMap",
    "java.lang.Object",
];

/// Parse `raw` as a JSON document and convert it.
pub fn convert_str(raw: &str, nominal_type: &str, ignore_null_map_pairs: bool) -> Result<TypedValue> {
    if raw.is_empty() {
        return Err(BridgeError::EmptyBody);
    }
    let document: Value =
        serde_json::from_str(raw).map_err(|e| BridgeError::InvalidJson(e.to_string()))?;
    convert_value(&document, nominal_type, ignore_null_map_pairs)
}

/// Convert an already-parsed JSON value.
pub fn convert_value(value: &Value, nominal_type: &str, ignore_null_map_pairs: bool) -> Result<TypedValue> {
    match value {
        Value::Null => Ok(TypedValue::Null),
        Value::String(s) if !nominal_type.is_empty() => {
            convert::convert(s, nominal_type, ignore_null_map_pairs)
        }
        Value::String(s) => Ok(TypedValue::String(s.clone())),
        Value::Bool(b) if convert::has_rule(nominal_type) => {
            convert::convert(&b.to_string(), nominal_type, ignore_null_map_pairs)
        }
        Value::Bool(b) => Ok(TypedValue::Boolean(*b)),
        Value::Number(n) if convert::has_rule(nominal_type) => {
            convert::convert(&n.to_string(), nominal_type, ignore_null_map_pairs)
        }
        Value::Number(n) => Ok(number_value(n)),
        Value::Array(_) | Value::Object(_) if convert::has_rule(nominal_type) => {
            Err(BridgeError::invalid(&value.to_string(), nominal_type))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| convert_value(item, "", ignore_null_map_pairs))
            .collect::<Result<Vec<_>>>()
            .map(TypedValue::List),
        Value::Object(object) => {
            let mut fields = Vec::with_capacity(object.len());
            for (key, item) in object {
                if ignore_null_map_pairs && item.is_null() {
                    continue;
                }
                fields.push((key.clone(), convert_value(item, "", ignore_null_map_pairs)?));
            }

            if MAP_TYPES.contains(&nominal_type) {
                Ok(TypedValue::Map(
                    fields
                        .into_iter()
                        .map(|(k, v)| (TypedValue::String(k), v))
                        .collect(),
                ))
            } else {
                Ok(TypedValue::Object {
                    class: nominal_type.to_string(),
                    fields,
                })
            }
        }
    }
}

fn number_value(n: &Number) -> TypedValue {
    if let Some(i) = n.as_i64() {
        match i32::try_from(i) {
            Ok(small) => TypedValue::Integer(small),
            Err(_) => TypedValue::Long(i),
        }
    } else {
        // u64 above i64::MAX or a fractional number
        TypedValue::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_without_declared_type() {
        assert_eq!(convert_value(&json!(null), "", false), Ok(TypedValue::Null));
        assert_eq!(convert_value(&json!(true), "", false), Ok(TypedValue::Boolean(true)));
        assert_eq!(convert_value(&json!(12), "", false), Ok(TypedValue::Integer(12)));
        assert_eq!(
            convert_value(&json!(5_000_000_000i64), "", false),
            Ok(TypedValue::Long(5_000_000_000))
        );
        assert_eq!(convert_value(&json!(0.25), "", false), Ok(TypedValue::Double(0.25)));
        assert_eq!(convert_value(&json!("x"), "", false), Ok(TypedValue::from("x")));
    }

    #[test]
    fn test_string_redispatches_with_declared_type() {
        assert_eq!(convert_value(&json!("42"), "int", false), Ok(TypedValue::Integer(42)));
        assert_eq!(convert_value(&json!("null"), "java.lang.Long", false), Ok(TypedValue::Null));
        assert!(matches!(
            convert_value(&json!("abc"), "long", false),
            Err(BridgeError::InvalidArgument { .. })
        ));
        // Embedded JSON for a custom class
        assert_eq!(
            convert_value(&json!(r#"{"a":1}"#), "com.example.Req", false),
            Ok(TypedValue::Object {
                class: "com.example.Req".into(),
                fields: vec![("a".into(), TypedValue::Integer(1))],
            })
        );
    }

    #[test]
    fn test_numbers_follow_declared_type() {
        assert_eq!(convert_value(&json!(5), "long", false), Ok(TypedValue::Long(5)));
        assert_eq!(convert_value(&json!(5), "java.lang.Double", false), Ok(TypedValue::Double(5.0)));
        assert_eq!(convert_value(&json!(5), "java.lang.String", false), Ok(TypedValue::from("5")));
        assert!(matches!(
            convert_value(&json!(5.5), "int", false),
            Err(BridgeError::InvalidArgument { .. })
        ));
        assert_eq!(convert_value(&json!(false), "java.lang.Boolean", false), Ok(TypedValue::Boolean(false)));
    }

    #[test]
    fn test_containers() {
        let doc = json!({"name": "a", "tags": ["x", 1], "extra": null});
        let value = convert_value(&doc, "", false).unwrap();
        assert_eq!(
            value,
            TypedValue::Map(vec![
                (TypedValue::from("extra"), TypedValue::Null),
                (TypedValue::from("name"), TypedValue::from("a")),
                (
                    TypedValue::from("tags"),
                    TypedValue::List(vec![TypedValue::from("x"), TypedValue::Integer(1)])
                ),
            ])
        );
        assert_eq!(value.to_json(), doc);
    }

    #[test]
    fn test_ignore_null_map_pairs() {
        let doc = json!({"a": null, "b": {"c": null, "d": 2}});
        let value = convert_value(&doc, "java.util.Map", true).unwrap();
        assert_eq!(value.to_json(), json!({"b": {"d": 2}}));

        let kept = convert_value(&doc, "java.util.Map", false).unwrap();
        assert_eq!(kept.to_json(), doc);
    }

    #[test]
    fn test_container_for_scalar_type_is_rejected() {
        assert!(matches!(
            convert_value(&json!([1, 2]), "int", false),
            Err(BridgeError::InvalidArgument { .. })
        ));
        assert!(matches!(
            convert_value(&json!({"a": 1}), "java.lang.String", false),
            Err(BridgeError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_raw_document_errors() {
        assert_eq!(convert_str("", "", false), Err(BridgeError::EmptyBody));
        assert!(matches!(convert_str("[1,", "", false), Err(BridgeError::InvalidJson(_))));
        assert_eq!(
            convert_str("[1,2]", "java.util.List", false),
            Ok(TypedValue::List(vec![TypedValue::Integer(1), TypedValue::Integer(2)]))
        );
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let doc = json!([{"k": [true, null, 1.5, "s"]}, -7, {"nested": {"deep": []}}]);
        let value = convert_value(&doc, "", false).unwrap();
        assert_eq!(value.to_json(), doc);
    }
}
