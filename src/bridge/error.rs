//! Bridge error taxonomy.

use thiserror::Error;

/// Errors raised while building RPC arguments or formatting RPC responses.
///
/// None of these are retried inside the bridge; the request is aborted and
/// the HTTP layer turns the error into a client-facing response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A non-nullable declared type received empty or `null` text.
    #[error("empty or null value not allowed for type {0}")]
    EmptyOrNullNotAllowed(String),

    /// Text failed a strict parse for the declared type.
    #[error("invalid argument {value:?} for type {ty}")]
    InvalidArgument { value: String, ty: String },

    /// Malformed JSON where a JSON document was required.
    #[error("invalid json: {0}")]
    InvalidJson(String),

    /// The request body could not be parsed as JSON.
    #[error("invalid json body: {0}")]
    InvalidJsonBody(String),

    /// JSON conversion was invoked on zero-length input.
    #[error("empty body where a json document was required")]
    EmptyBody,

    /// Several declared parameters but their names are unknown.
    #[error("{0} declared parameters require known parameter names")]
    AmbiguousParameters(usize),

    /// A single unnamed parameter was supplied more than one raw entry.
    #[error("expected at most one value for an unnamed parameter, got {0}")]
    TooManyQueryValues(usize),

    /// A plain-text body can only carry a single parameter.
    #[error("a text/plain body carries one parameter, {0} declared")]
    TooManyParametersForPlainBody(usize),

    /// Envelope body without a `paramValues` array.
    #[error("request envelope is missing the paramValues array")]
    MissingParamValues,

    /// A routing header needed to build a dynamic call is absent.
    #[error("missing required header {0}")]
    MissingRequiredHeader(String),

    /// Malformed static configuration detected while building a descriptor.
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl BridgeError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::EmptyOrNullNotAllowed(_) => "empty_or_null",
            BridgeError::InvalidArgument { .. } => "invalid_argument",
            BridgeError::InvalidJson(_) => "invalid_json",
            BridgeError::InvalidJsonBody(_) => "invalid_json_body",
            BridgeError::EmptyBody => "empty_body",
            BridgeError::AmbiguousParameters(_) => "ambiguous_parameters",
            BridgeError::TooManyQueryValues(_) => "too_many_query_values",
            BridgeError::TooManyParametersForPlainBody(_) => "too_many_parameters",
            BridgeError::MissingParamValues => "missing_param_values",
            BridgeError::MissingRequiredHeader(_) => "missing_header",
            BridgeError::ConfigurationError(_) => "configuration",
        }
    }

    pub(crate) fn invalid(value: &str, ty: &str) -> Self {
        BridgeError::InvalidArgument {
            value: value.to_string(),
            ty: ty.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
