//! Plain-text body argument.

use crate::bridge::convert;
use crate::bridge::descriptor::{CallDescriptor, Parameter};
use crate::bridge::error::{BridgeError, Result};
use crate::bridge::resolver::ResolveArgument;
use crate::bridge::value::TypedValue;

/// Passes a `text/plain` body as the value of the single declared parameter.
#[derive(Debug)]
pub struct TextResolver {
    text: String,
    ignore_null_map_pairs: bool,
}

impl TextResolver {
    pub fn new(descriptor: &CallDescriptor, body: &[u8]) -> Result<Self> {
        let count = descriptor.parameters().len();
        if count > 1 {
            return Err(BridgeError::TooManyParametersForPlainBody(count));
        }
        Ok(Self {
            text: String::from_utf8_lossy(body).into_owned(),
            ignore_null_map_pairs: descriptor.ignore_null_map_pairs(),
        })
    }
}

impl ResolveArgument for TextResolver {
    fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        convert::convert(&self.text, &parameter.ty, self.ignore_null_map_pairs).map(Some)
    }
}
