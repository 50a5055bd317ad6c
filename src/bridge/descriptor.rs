//! Call descriptors: the declared shape of one RPC call.
//!
//! # Responsibilities
//! - Hold the ordered parameter list and argument-source policy for a route
//! - Parse `name:type` parameter spec lists from configuration
//! - Build a per-request descriptor from routing headers for dynamic routes
//!
//! # Design Decisions
//! - Descriptors are immutable after construction and shared via `Arc`
//! - Parameter index is the position in the declared list
//! - Spec errors are reported at build time, never per request

use serde::{Deserialize, Serialize};

use crate::bridge::error::{BridgeError, Result};
use crate::bridge::request::RequestSnapshot;

/// Header carrying the target service of a dynamic call.
pub const SERVICE_HEADER: &str = "x-dubbo-service";
/// Header carrying the target method of a dynamic call.
pub const METHOD_HEADER: &str = "x-dubbo-method";
pub const GROUP_HEADER: &str = "x-dubbo-group";
pub const VERSION_HEADER: &str = "x-dubbo-version";
/// Comma-separated parameter spec list.
pub const PARAMS_HEADER: &str = "x-dubbo-params";
pub const NAMES_UNKNOWN_HEADER: &str = "x-dubbo-names-unknown";
pub const SOURCE_HEADER: &str = "x-dubbo-source";

/// Where a route's arguments are read from by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentSource {
    #[default]
    Body,
    Query,
}

impl ArgumentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentSource::Body => "body",
            ArgumentSource::Query => "query",
        }
    }
}

impl std::str::FromStr for ArgumentSource {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body" => Ok(ArgumentSource::Body),
            "query" => Ok(ArgumentSource::Query),
            other => Err(BridgeError::ConfigurationError(format!(
                "unknown argument source {other:?}"
            ))),
        }
    }
}

/// One declared RPC call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Empty when parameter names are unknown.
    pub name: String,
    /// Nominal type; empty means "infer from JSON".
    pub ty: String,
    pub index: usize,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            index,
        }
    }
}

/// Immutable per-route description of the expected RPC parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    parameters: Vec<Parameter>,
    parameter_names_unknown: bool,
    ignore_null_map_pairs: bool,
    argument_source: ArgumentSource,
}

impl CallDescriptor {
    /// Build a descriptor, rejecting named-lookup configurations without names.
    pub fn new(
        parameters: Vec<Parameter>,
        parameter_names_unknown: bool,
        ignore_null_map_pairs: bool,
        argument_source: ArgumentSource,
    ) -> Result<Self> {
        if !parameter_names_unknown {
            if let Some(p) = parameters.iter().find(|p| p.name.is_empty()) {
                return Err(BridgeError::ConfigurationError(format!(
                    "parameter {} has no name but parameter names are declared known",
                    p.index
                )));
            }
        }
        Ok(Self {
            parameters,
            parameter_names_unknown,
            ignore_null_map_pairs,
            argument_source,
        })
    }

    /// Build from a `name:type` spec list (bare `type` entries when names are unknown).
    pub fn from_specs<S: AsRef<str>>(
        specs: &[S],
        parameter_names_unknown: bool,
        ignore_null_map_pairs: bool,
        argument_source: ArgumentSource,
    ) -> Result<Self> {
        let parameters = parse_param_specs(specs, parameter_names_unknown)?;
        Self::new(parameters, parameter_names_unknown, ignore_null_map_pairs, argument_source)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter_names_unknown(&self) -> bool {
        self.parameter_names_unknown
    }

    pub fn ignore_null_map_pairs(&self) -> bool {
        self.ignore_null_map_pairs
    }

    pub fn argument_source(&self) -> ArgumentSource {
        self.argument_source
    }

    /// Declared types in parameter order, as sent to the RPC layer.
    pub fn parameter_types(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }
}

/// Parse a parameter spec list.
///
/// Entries are `name:type`; when names are unknown an entry may be a bare
/// `type`. An empty type after `:` is always a configuration error.
pub fn parse_param_specs<S: AsRef<str>>(specs: &[S], parameter_names_unknown: bool) -> Result<Vec<Parameter>> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let spec = spec.as_ref().trim();
            let (name, ty) = match spec.split_once(':') {
                Some((name, ty)) => (name.trim(), ty.trim()),
                None if parameter_names_unknown => ("", spec),
                None => {
                    return Err(BridgeError::ConfigurationError(format!(
                        "parameter spec {spec:?} must be name:type"
                    )))
                }
            };
            if ty.is_empty() {
                return Err(BridgeError::ConfigurationError(format!(
                    "parameter spec {spec:?} declares an empty type"
                )));
            }
            if name.is_empty() && !parameter_names_unknown {
                return Err(BridgeError::ConfigurationError(format!(
                    "parameter spec {spec:?} declares an empty name"
                )));
            }
            let name = if parameter_names_unknown { "" } else { name };
            Ok(Parameter::new(name, ty, index))
        })
        .collect()
}

/// Identity of the remote procedure being called.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RpcTarget {
    pub service: String,
    pub method: String,
    pub group: Option<String>,
    pub version: Option<String>,
}

/// Build the target and descriptor of a call from routing headers.
pub fn dynamic_descriptor(request: &RequestSnapshot<'_>, ignore_null_map_pairs: bool) -> Result<(RpcTarget, CallDescriptor)> {
    let required = |name: &str| {
        request
            .header(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| BridgeError::MissingRequiredHeader(name.to_string()))
    };
    let optional = |name: &str| {
        request
            .header(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let target = RpcTarget {
        service: required(SERVICE_HEADER)?,
        method: required(METHOD_HEADER)?,
        group: optional(GROUP_HEADER),
        version: optional(VERSION_HEADER),
    };

    let names_unknown = optional(NAMES_UNKNOWN_HEADER).is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let source = match optional(SOURCE_HEADER) {
        Some(v) => v.parse()?,
        None => ArgumentSource::Body,
    };
    let specs: Vec<&str> = request
        .header(PARAMS_HEADER)
        .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let descriptor = CallDescriptor::from_specs(&specs, names_unknown, ignore_null_map_pairs, source)?;
    Ok((target, descriptor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::Request;

    #[test]
    fn test_parse_named_specs() {
        let params = parse_param_specs(&["id:int", " name : java.lang.String "], false).unwrap();
        assert_eq!(
            params,
            vec![
                Parameter::new("id", "int", 0),
                Parameter::new("name", "java.lang.String", 1)
            ]
        );
    }

    #[test]
    fn test_parse_unnamed_specs() {
        let params = parse_param_specs(&["int", "ignored:long"], true).unwrap();
        assert_eq!(params, vec![Parameter::new("", "int", 0), Parameter::new("", "long", 1)]);
    }

    #[test]
    fn test_spec_errors() {
        assert!(matches!(
            parse_param_specs(&["id:"], false),
            Err(BridgeError::ConfigurationError(_))
        ));
        assert!(matches!(
            parse_param_specs(&["int"], false),
            Err(BridgeError::ConfigurationError(_))
        ));
        assert!(matches!(
            parse_param_specs(&[":int"], false),
            Err(BridgeError::ConfigurationError(_))
        ));
        assert!(matches!(
            parse_param_specs(&[""], true),
            Err(BridgeError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_descriptor_requires_names_when_known() {
        let err = CallDescriptor::new(vec![Parameter::new("", "int", 0)], false, false, ArgumentSource::Body);
        assert!(matches!(err, Err(BridgeError::ConfigurationError(_))));
    }

    #[test]
    fn test_dynamic_descriptor_from_headers() {
        let req = Request::builder()
            .uri("/rpc")
            .header(SERVICE_HEADER, "com.example.Echo")
            .header(METHOD_HEADER, "echo")
            .header(VERSION_HEADER, "1.0.0")
            .header(PARAMS_HEADER, "msg:java.lang.String, n:int")
            .header(SOURCE_HEADER, "query")
            .body(Bytes::new())
            .unwrap();
        let (target, descriptor) = dynamic_descriptor(&RequestSnapshot::of(&req), true).unwrap();

        assert_eq!(target.service, "com.example.Echo");
        assert_eq!(target.method, "echo");
        assert_eq!(target.group, None);
        assert_eq!(target.version.as_deref(), Some("1.0.0"));
        assert_eq!(descriptor.parameters().len(), 2);
        assert_eq!(descriptor.parameter_types(), vec!["java.lang.String", "int"]);
        assert_eq!(descriptor.argument_source(), ArgumentSource::Query);
        assert!(descriptor.ignore_null_map_pairs());
    }

    #[test]
    fn test_dynamic_descriptor_missing_headers() {
        let req = Request::builder()
            .uri("/rpc")
            .header(SERVICE_HEADER, "com.example.Echo")
            .body(Bytes::new())
            .unwrap();
        assert_eq!(
            dynamic_descriptor(&RequestSnapshot::of(&req), false),
            Err(BridgeError::MissingRequiredHeader(METHOD_HEADER.to_string()))
        );
    }
}
