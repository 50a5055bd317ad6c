//! Query-string arguments.

use std::collections::BTreeMap;

use crate::bridge::convert;
use crate::bridge::descriptor::{CallDescriptor, Parameter};
use crate::bridge::error::{BridgeError, Result};
use crate::bridge::resolver::ResolveArgument;
use crate::bridge::value::TypedValue;

/// Decode `application/x-www-form-urlencoded` pairs; repeated keys keep the last value.
pub(crate) fn parse_fields(encoded: &[u8]) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(encoded)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Reads arguments from the request's query string.
#[derive(Debug)]
pub struct QueryResolver {
    values: BTreeMap<String, String>,
    single: bool,
    names_unknown: bool,
    ignore_null_map_pairs: bool,
}

impl QueryResolver {
    pub fn new(descriptor: &CallDescriptor, query: &str) -> Result<Self> {
        let values = parse_fields(query.as_bytes());
        let count = descriptor.parameters().len();
        let names_unknown = descriptor.parameter_names_unknown();

        if count > 1 && names_unknown {
            return Err(BridgeError::AmbiguousParameters(count));
        }
        if count == 1 && names_unknown && values.len() > 1 {
            return Err(BridgeError::TooManyQueryValues(values.len()));
        }

        Ok(Self {
            values,
            single: count == 1,
            names_unknown,
            ignore_null_map_pairs: descriptor.ignore_null_map_pairs(),
        })
    }

    fn lookup(&self, parameter: &Parameter) -> Option<&str> {
        if self.single && self.values.len() == 1 {
            // A lone entry satisfies a lone parameter whatever its key
            return self.values.values().next().map(String::as_str);
        }
        if self.names_unknown {
            return None;
        }
        self.values.get(&parameter.name).map(String::as_str)
    }
}

impl ResolveArgument for QueryResolver {
    fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        self.lookup(parameter)
            .map(|raw| convert::convert(raw, &parameter.ty, self.ignore_null_map_pairs))
            .transpose()
    }
}
