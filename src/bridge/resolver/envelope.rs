//! Gateway request envelope.
//!
//! The body is one JSON object:
//! ```json
//! {"paramValues": [1, "two"], "attachments": {"k": "v"}}
//! ```
//! Parameters are looked up by position in `paramValues`, never by name.

use std::collections::HashMap;

use serde_json::Value;

use crate::bridge::descriptor::{CallDescriptor, Parameter};
use crate::bridge::error::{BridgeError, Result};
use crate::bridge::json;
use crate::bridge::resolver::ResolveArgument;
use crate::bridge::value::TypedValue;

const PARAM_VALUES_FIELD: &str = "paramValues";
const ATTACHMENTS_FIELD: &str = "attachments";

#[derive(Debug)]
pub struct EnvelopeResolver {
    param_values: Vec<Value>,
    attachments: HashMap<String, String>,
    ignore_null_map_pairs: bool,
}

impl EnvelopeResolver {
    pub fn new(descriptor: &CallDescriptor, body: &[u8]) -> Result<Self> {
        if body.is_empty() {
            return Err(BridgeError::MissingParamValues);
        }
        let envelope: Value =
            serde_json::from_slice(body).map_err(|e| BridgeError::InvalidJsonBody(e.to_string()))?;
        let Value::Object(mut envelope) = envelope else {
            return Err(BridgeError::MissingParamValues);
        };

        let param_values = match envelope.remove(PARAM_VALUES_FIELD) {
            Some(Value::Array(values)) => values,
            _ => return Err(BridgeError::MissingParamValues),
        };

        let attachments = match envelope.remove(ATTACHMENTS_FIELD) {
            Some(Value::Object(fields)) => fields
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| match v {
                    Value::String(s) => (k, s),
                    other => (k, other.to_string()),
                })
                .collect(),
            _ => HashMap::new(),
        };

        Ok(Self {
            param_values,
            attachments,
            ignore_null_map_pairs: descriptor.ignore_null_map_pairs(),
        })
    }

    /// Attachments carried in the envelope; emptied by the first call.
    pub fn take_attachments(&mut self) -> HashMap<String, String> {
        std::mem::take(&mut self.attachments)
    }
}

impl ResolveArgument for EnvelopeResolver {
    fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        self.param_values
            .get(parameter.index)
            .map(|value| json::convert_value(value, &parameter.ty, self.ignore_null_map_pairs))
            .transpose()
    }
}
