//! JSON body arguments.

use serde_json::Value;

use crate::bridge::descriptor::{CallDescriptor, Parameter};
use crate::bridge::error::{BridgeError, Result};
use crate::bridge::json;
use crate::bridge::resolver::ResolveArgument;
use crate::bridge::value::TypedValue;

/// Reads arguments from a JSON request body, parsed once.
#[derive(Debug)]
pub struct JsonBodyResolver {
    document: Value,
    single: bool,
    names_unknown: bool,
    ignore_null_map_pairs: bool,
}

impl JsonBodyResolver {
    /// Parse the body.
    ///
    /// With exactly one declared parameter, a body that is not valid JSON is
    /// taken verbatim as a JSON string literal instead of failing.
    pub fn new(descriptor: &CallDescriptor, body: &[u8]) -> Result<Self> {
        let single = descriptor.parameters().len() == 1;
        let document = match serde_json::from_slice::<Value>(body) {
            Ok(document) => document,
            Err(e) if single => {
                tracing::debug!(error = %e, "Body is not JSON, passing it as a string literal");
                Value::String(String::from_utf8_lossy(body).into_owned())
            }
            Err(_) if body.is_empty() => return Err(BridgeError::EmptyBody),
            Err(e) => return Err(BridgeError::InvalidJsonBody(e.to_string())),
        };

        Ok(Self {
            document,
            single,
            names_unknown: descriptor.parameter_names_unknown(),
            ignore_null_map_pairs: descriptor.ignore_null_map_pairs(),
        })
    }

    fn convert(&self, value: &Value, parameter: &Parameter) -> Result<TypedValue> {
        json::convert_value(value, &parameter.ty, self.ignore_null_map_pairs)
    }

    fn field(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        self.document
            .as_object()
            .and_then(|object| object.get(&parameter.name))
            .map(|value| self.convert(value, parameter))
            .transpose()
    }
}

impl ResolveArgument for JsonBodyResolver {
    fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        match (self.single, self.names_unknown) {
            (true, true) => self.convert(&self.document, parameter).map(Some),
            (true, false) if self.document.is_object() => self.field(parameter),
            (true, false) => self.convert(&self.document, parameter).map(Some),
            (false, true) => self
                .document
                .as_array()
                .and_then(|items| items.get(parameter.index))
                .map(|value| self.convert(value, parameter))
                .transpose(),
            (false, false) => self.field(parameter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::descriptor::ArgumentSource;

    fn descriptor(specs: &[&str], names_unknown: bool) -> CallDescriptor {
        CallDescriptor::from_specs(specs, names_unknown, false, ArgumentSource::Body).unwrap()
    }

    #[test]
    fn test_single_unnamed_takes_whole_document() {
        let d = descriptor(&["java.util.List"], true);
        let r = JsonBodyResolver::new(&d, b"[1,2]").unwrap();
        assert_eq!(
            r.get_argument(&d.parameters()[0]),
            Ok(Some(TypedValue::List(vec![TypedValue::Integer(1), TypedValue::Integer(2)])))
        );
    }

    #[test]
    fn test_single_invalid_json_falls_back_to_string() {
        let d = descriptor(&["java.lang.String"], true);
        let r = JsonBodyResolver::new(&d, b"hello").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::from("hello"))));

        let d = descriptor(&["int"], true);
        let r = JsonBodyResolver::new(&d, b"12x").unwrap();
        assert!(matches!(r.get_argument(&d.parameters()[0]), Err(BridgeError::InvalidArgument { .. })));
    }

    #[test]
    fn test_multiple_invalid_json_fails() {
        let d = descriptor(&["a:int", "b:int"], false);
        assert!(matches!(JsonBodyResolver::new(&d, b"{nope"), Err(BridgeError::InvalidJsonBody(_))));
        assert!(matches!(JsonBodyResolver::new(&d, b""), Err(BridgeError::EmptyBody)));
    }

    #[test]
    fn test_single_named_object_lookup() {
        let d = descriptor(&["id:long"], false);
        let r = JsonBodyResolver::new(&d, br#"{"id": 5, "other": 1}"#).unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::Long(5))));

        let r = JsonBodyResolver::new(&d, br#"{"other": 1}"#).unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(None));

        // Not an object: the whole document is the value
        let r = JsonBodyResolver::new(&d, b"5").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::Long(5))));
    }

    #[test]
    fn test_multiple_unnamed_index_into_array() {
        let d = descriptor(&["int", "java.lang.String", "int"], true);
        let r = JsonBodyResolver::new(&d, br#"[1, "two"]"#).unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::Integer(1))));
        assert_eq!(r.get_argument(&d.parameters()[1]), Ok(Some(TypedValue::from("two"))));
        assert_eq!(r.get_argument(&d.parameters()[2]), Ok(None));

        let r = JsonBodyResolver::new(&d, br#"{"a": 1}"#).unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(None));
    }

    #[test]
    fn test_multiple_named_object_fields() {
        let d = descriptor(&["a:int", "b:java.util.Map"], false);
        let r = JsonBodyResolver::new(&d, br#"{"a": 1, "b": {"k": "v"}}"#).unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::Integer(1))));
        assert_eq!(
            r.get_argument(&d.parameters()[1]),
            Ok(Some(TypedValue::Map(vec![(TypedValue::from("k"), TypedValue::from("v"))])))
        );

        let r = JsonBodyResolver::new(&d, b"[1, 2]").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(None));
    }
}
