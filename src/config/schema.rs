//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::bridge::descriptor::{ArgumentSource, CallDescriptor, RpcTarget};
use crate::bridge::error::BridgeError;
use crate::bridge::getter::DEFAULT_ATTACHMENT_PREFIX;
use crate::bridge::response::ResponseFlavor;

/// Root configuration for the bridge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Defaults shared by every route.
    pub bridge: BridgeDefaults,

    /// Route definitions mapping HTTP paths to RPC calls.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Bridge-wide defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeDefaults {
    /// Headers starting with this prefix are forwarded as attachments.
    /// Empty disables header attachments.
    pub attachment_prefix: String,

    /// Response wrapping.
    pub response_flavor: ResponseFlavor,

    /// Expect the gateway `paramValues` envelope as request body.
    pub request_envelope: bool,
}

impl Default for BridgeDefaults {
    fn default() -> Self {
        Self {
            attachment_prefix: DEFAULT_ATTACHMENT_PREFIX.to_string(),
            response_flavor: ResponseFlavor::Plain,
            request_envelope: false,
        }
    }
}

/// One HTTP path bridged to one RPC method.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Exact request path.
    pub path: String,

    /// Take service, method and parameters from request headers.
    pub dynamic: bool,

    pub service: String,
    pub method: String,
    pub group: Option<String>,
    pub version: Option<String>,

    /// Parameter specs: `name:type`, or bare `type` when names are unknown.
    pub params: Vec<String>,

    pub parameter_names_unknown: bool,

    /// Drop null-valued entries from decoded JSON objects.
    pub ignore_null_map_pairs: bool,

    pub argument_source: ArgumentSource,

    /// Overrides `bridge.response_flavor`.
    pub response_flavor: Option<ResponseFlavor>,

    /// Overrides `bridge.request_envelope`.
    pub request_envelope: Option<bool>,
}

impl RouteConfig {
    /// Static call descriptor; dynamic routes build theirs per request.
    pub fn descriptor(&self) -> Result<CallDescriptor, BridgeError> {
        CallDescriptor::from_specs(
            &self.params,
            self.parameter_names_unknown,
            self.ignore_null_map_pairs,
            self.argument_source,
        )
    }

    pub fn target(&self) -> RpcTarget {
        RpcTarget {
            service: self.service.clone(),
            method: self.method.clone(),
            group: self.group.clone().filter(|g| !g.is_empty()),
            version: self.version.clone().filter(|v| !v.is_empty()),
        }
    }

    pub fn response_flavor(&self, defaults: &BridgeDefaults) -> ResponseFlavor {
        self.response_flavor.unwrap_or(defaults.response_flavor)
    }

    pub fn request_envelope(&self, defaults: &BridgeDefaults) -> bool {
        self.request_envelope.unwrap_or(defaults.request_envelope)
    }
}
