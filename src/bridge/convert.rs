//! Typed value conversion from request text.
//!
//! # Responsibilities
//! - Map a declared nominal type name to a conversion rule
//! - Apply null/empty handling per rule (boxed vs primitive)
//! - Strictly parse numeric and boolean text
//!
//! # Design Decisions
//! - Type names are matched exactly (case-sensitive); configuration files
//!   reference the boxed `java.lang.*` names literally
//! - Unknown type names fall through to the JSON converter with the text
//!   treated as a raw JSON document
//! - The table is built once per process and never mutated

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::bridge::error::{BridgeError, Result};
use crate::bridge::json;
use crate::bridge::value::TypedValue;

/// Strict parser for a textual scalar.
type Parser = fn(&str, &str) -> Result<TypedValue>;

/// Conversion rule attached to a nominal type name.
#[derive(Clone, Copy)]
enum Rule {
    /// Boxed type: literal `null` is Null, empty text is rejected.
    Boxed(Parser),
    /// Primitive type: both `null` and empty text are rejected.
    Primitive(Parser),
    /// `char`: single character, never null.
    Char,
    /// Boxed textual types (`Character`, `Enum`, `BigDecimal`, ...): `null` is Null.
    Textual,
    /// `java.lang.String`: empty text is a valid empty string.
    Str,
    /// `java.lang.Void`: always Null.
    Void,
}

static RULES: LazyLock<HashMap<&'static str, Rule>> = LazyLock::new(|| {
    HashMap::from([
        ("java.lang.Boolean", Rule::Boxed(parse_bool)),
        ("java.lang.Float", Rule::Boxed(parse_double)),
        ("java.lang.Double", Rule::Boxed(parse_double)),
        ("java.lang.Byte", Rule::Boxed(parse_byte)),
        ("java.lang.Short", Rule::Boxed(parse_short)),
        ("java.lang.Integer", Rule::Boxed(parse_int)),
        ("java.lang.Long", Rule::Boxed(parse_long)),
        ("boolean", Rule::Primitive(parse_bool)),
        ("float", Rule::Primitive(parse_double)),
        ("double", Rule::Primitive(parse_double)),
        ("byte", Rule::Primitive(parse_byte)),
        ("short", Rule::Primitive(parse_short)),
        ("int", Rule::Primitive(parse_int)),
        ("long", Rule::Primitive(parse_long)),
        ("char", Rule::Char),
        ("java.lang.Character", Rule::Textual),
        ("java.lang.String", Rule::Str),
        ("java.lang.Enum", Rule::Textual),
        ("java.math.BigDecimal", Rule::Textual),
        ("java.math.BigInteger", Rule::Textual),
        ("java.time.DayOfWeek", Rule::Textual),
        ("java.lang.Void", Rule::Void),
    ])
});

/// Returns true if `nominal_type` has a dedicated text conversion rule.
pub fn has_rule(nominal_type: &str) -> bool {
    RULES.contains_key(nominal_type)
}

/// Convert request text into a typed value for the declared `nominal_type`.
///
/// Types without a dedicated rule are parsed as a JSON document and converted
/// by [`json::convert_str`].
pub fn convert(text: &str, nominal_type: &str, ignore_null_map_pairs: bool) -> Result<TypedValue> {
    let Some(rule) = RULES.get(nominal_type) else {
        return json::convert_str(text, nominal_type, ignore_null_map_pairs);
    };

    match *rule {
        Rule::Boxed(parse) => {
            if text == "null" {
                Ok(TypedValue::Null)
            } else if text.is_empty() {
                Err(BridgeError::EmptyOrNullNotAllowed(nominal_type.to_string()))
            } else {
                parse(text, nominal_type)
            }
        }
        Rule::Primitive(parse) => {
            if text.is_empty() || text == "null" {
                Err(BridgeError::EmptyOrNullNotAllowed(nominal_type.to_string()))
            } else {
                parse(text, nominal_type)
            }
        }
        Rule::Char => match text.chars().next() {
            Some(c) if text != "null" => Ok(TypedValue::String(c.to_string())),
            _ => Err(BridgeError::EmptyOrNullNotAllowed(nominal_type.to_string())),
        },
        Rule::Textual => match text {
            "null" => Ok(TypedValue::Null),
            "" => Err(BridgeError::EmptyOrNullNotAllowed(nominal_type.to_string())),
            _ => Ok(TypedValue::String(text.to_string())),
        },
        Rule::Str => match text {
            "null" => Ok(TypedValue::Null),
            _ => Ok(TypedValue::String(text.to_string())),
        },
        Rule::Void => Ok(TypedValue::Null),
    }
}

fn parse_bool(text: &str, ty: &str) -> Result<TypedValue> {
    text.parse::<bool>()
        .map(TypedValue::Boolean)
        .map_err(|_| BridgeError::invalid(text, ty))
}

fn parse_double(text: &str, ty: &str) -> Result<TypedValue> {
    text.parse::<f64>()
        .map(TypedValue::Double)
        .map_err(|_| BridgeError::invalid(text, ty))
}

fn parse_byte(text: &str, ty: &str) -> Result<TypedValue> {
    text.parse::<i8>()
        .map(|b| TypedValue::Integer(b.into()))
        .map_err(|_| BridgeError::invalid(text, ty))
}

fn parse_short(text: &str, ty: &str) -> Result<TypedValue> {
    text.parse::<i16>()
        .map(|s| TypedValue::Integer(s.into()))
        .map_err(|_| BridgeError::invalid(text, ty))
}

fn parse_int(text: &str, ty: &str) -> Result<TypedValue> {
    text.parse::<i32>()
        .map(TypedValue::Integer)
        .map_err(|_| BridgeError::invalid(text, ty))
}

fn parse_long(text: &str, ty: &str) -> Result<TypedValue> {
    text.parse::<i64>()
        .map(TypedValue::Long)
        .map_err(|_| BridgeError::invalid(text, ty))
}
