//! URL-encoded form body arguments.

use std::collections::BTreeMap;

use serde_json::{Map as JsonMap, Value};

use crate::bridge::convert;
use crate::bridge::descriptor::{CallDescriptor, Parameter};
use crate::bridge::error::{BridgeError, Result};
use crate::bridge::json;
use crate::bridge::resolver::query::parse_fields;
use crate::bridge::resolver::ResolveArgument;
use crate::bridge::value::TypedValue;

/// Reads arguments from an `application/x-www-form-urlencoded` body.
///
/// A single unnamed parameter receives the whole form as one JSON object.
#[derive(Debug)]
pub struct FormResolver {
    fields: BTreeMap<String, String>,
    single: bool,
    names_unknown: bool,
    ignore_null_map_pairs: bool,
}

impl FormResolver {
    pub fn new(descriptor: &CallDescriptor, body: &[u8]) -> Result<Self> {
        let count = descriptor.parameters().len();
        let names_unknown = descriptor.parameter_names_unknown();
        if count > 1 && names_unknown {
            return Err(BridgeError::AmbiguousParameters(count));
        }

        Ok(Self {
            fields: parse_fields(body),
            single: count == 1,
            names_unknown,
            ignore_null_map_pairs: descriptor.ignore_null_map_pairs(),
        })
    }

    fn whole_form(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        if self.fields.is_empty() {
            return Ok(None);
        }
        let object: JsonMap<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        json::convert_value(&Value::Object(object), &parameter.ty, self.ignore_null_map_pairs).map(Some)
    }
}

impl ResolveArgument for FormResolver {
    fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        if self.single && self.names_unknown {
            return self.whole_form(parameter);
        }

        let raw = if self.single && self.fields.len() == 1 {
            self.fields.values().next()
        } else {
            self.fields.get(&parameter.name)
        };
        raw.map(|v| convert::convert(v, &parameter.ty, self.ignore_null_map_pairs))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::descriptor::ArgumentSource;

    #[test]
    fn test_named_fields() {
        let d = CallDescriptor::from_specs(&["a:int", "b:boolean"], false, false, ArgumentSource::Body).unwrap();
        let r = FormResolver::new(&d, b"a=3&b=true").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::Integer(3))));
        assert_eq!(r.get_argument(&d.parameters()[1]), Ok(Some(TypedValue::Boolean(true))));

        let r = FormResolver::new(&d, b"b=false").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(None));
        assert_eq!(r.get_argument(&d.parameters()[1]), Ok(Some(TypedValue::Boolean(false))));
    }

    #[test]
    fn test_single_named_looks_up_by_name() {
        let d = CallDescriptor::from_specs(&["id:long"], false, false, ArgumentSource::Body).unwrap();
        let r = FormResolver::new(&d, b"other=5&id=12").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::Long(12))));

        let r = FormResolver::new(&d, b"other=5&more=6").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(None));
    }

    #[test]
    fn test_single_unnamed_gets_whole_form() {
        let d = CallDescriptor::from_specs(&["com.example.Login"], true, false, ArgumentSource::Body).unwrap();
        let r = FormResolver::new(&d, b"user=bob&pass=s%20ecret").unwrap();
        assert_eq!(
            r.get_argument(&d.parameters()[0]),
            Ok(Some(TypedValue::Object {
                class: "com.example.Login".into(),
                fields: vec![
                    ("pass".into(), TypedValue::from("s ecret")),
                    ("user".into(), TypedValue::from("bob")),
                ],
            }))
        );

        let empty = FormResolver::new(&d, b"").unwrap();
        assert_eq!(empty.get_argument(&d.parameters()[0]), Ok(None));
    }

    #[test]
    fn test_many_unnamed_is_ambiguous() {
        let d = CallDescriptor::from_specs(&["int", "int"], true, false, ArgumentSource::Body).unwrap();
        assert_eq!(FormResolver::new(&d, b"a=1").unwrap_err(), BridgeError::AmbiguousParameters(2));
    }

    #[test]
    fn test_single_named_lone_entry_shortcut() {
        let d = CallDescriptor::from_specs(&["id:long"], false, false, ArgumentSource::Body).unwrap();
        let r = FormResolver::new(&d, b"other=5").unwrap();
        assert_eq!(r.get_argument(&d.parameters()[0]), Ok(Some(TypedValue::Long(5))));
    }
}
