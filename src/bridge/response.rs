//! RPC result to HTTP response formatting.
//!
//! # Responsibilities
//! - Render an RPC return value as an HTTP body
//! - Map the outcome kind (normal, exception, local) to a status code
//! - Wrap JSON results in the gateway envelope when configured
//!
//! # Design Decisions
//! - Strings and binary pass through verbatim on success, even in envelope flavors
//! - An absent result is the literal body `null` with no status override
//! - The instance id is read from the environment once per process

use std::sync::LazyLock;

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bridge::value::TypedValue;

/// Environment variable naming this gateway instance.
pub const INSTANCE_ID_ENV: &str = "INSTANCE_IP";
pub const DEFAULT_INSTANCE_ID: &str = "0.0.0.0";

/// Status used when the remote procedure raised an exception.
pub const EXCEPTION_STATUS: u16 = 610;
/// Status used for locally produced responses.
pub const LOCAL_STATUS: u16 = 400;
/// Envelope `code` for locally produced responses in the gateway flavor.
pub const GATEWAY_LOCAL_CODE: u16 = 415;
/// Fixed `systemId` of gateway envelopes.
pub const GATEWAY_SYSTEM_ID: &str = "dubbo-bridge";

static INSTANCE_ID: LazyLock<String> = LazyLock::new(|| {
    std::env::var(INSTANCE_ID_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_INSTANCE_ID.to_string())
});

/// This process's gateway instance id.
pub fn instance_id() -> &'static str {
    INSTANCE_ID.as_str()
}

/// How responses are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFlavor {
    #[default]
    Plain,
    Envelope,
    Gateway,
}

/// Where the value being formatted came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Normal,
    Exception,
    /// Produced locally without reaching the remote service.
    LocalShortCircuit,
}

impl ReplyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyKind::Normal => "normal",
            ReplyKind::Exception => "exception",
            ReplyKind::LocalShortCircuit => "local",
        }
    }
}

/// Body and optional status override handed back to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedResponse {
    pub body: Bytes,
    /// `None` leaves the caller's default status in place.
    pub status: Option<u16>,
}

impl FormattedResponse {
    fn new(body: impl Into<Bytes>, status: Option<u16>) -> Self {
        Self {
            body: body.into(),
            status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    flavor: ResponseFlavor,
    instance_id: String,
}

impl ResponseFormatter {
    pub fn new(flavor: ResponseFlavor) -> Self {
        Self::with_instance_id(flavor, instance_id())
    }

    pub fn with_instance_id(flavor: ResponseFlavor, instance_id: impl Into<String>) -> Self {
        Self {
            flavor,
            instance_id: instance_id.into(),
        }
    }

    pub fn flavor(&self) -> ResponseFlavor {
        self.flavor
    }

    pub fn format(&self, value: Option<&TypedValue>, kind: ReplyKind) -> FormattedResponse {
        let Some(value) = value else {
            return FormattedResponse::new("null", None);
        };

        match self.flavor {
            ResponseFlavor::Plain => FormattedResponse::new(passthrough(value), None),
            ResponseFlavor::Envelope | ResponseFlavor::Gateway => {
                if kind == ReplyKind::Normal {
                    if let TypedValue::String(_) | TypedValue::Binary(_) = value {
                        return FormattedResponse::new(passthrough(value), Some(200));
                    }
                }
                let (code, status) = self.codes(kind);
                FormattedResponse::new(self.envelope(value, code), Some(status))
            }
        }
    }

    /// Envelope `code` and HTTP status for an outcome.
    fn codes(&self, kind: ReplyKind) -> (u16, u16) {
        match (self.flavor, kind) {
            (_, ReplyKind::Normal) => (200, 200),
            (_, ReplyKind::Exception) => (EXCEPTION_STATUS, EXCEPTION_STATUS),
            (ResponseFlavor::Gateway, ReplyKind::LocalShortCircuit) => (GATEWAY_LOCAL_CODE, LOCAL_STATUS),
            (_, ReplyKind::LocalShortCircuit) => (LOCAL_STATUS, LOCAL_STATUS),
        }
    }

    fn envelope(&self, value: &TypedValue, code: u16) -> String {
        let envelope = match self.flavor {
            ResponseFlavor::Gateway => json!({
                "code": code,
                "systemId": GATEWAY_SYSTEM_ID,
                "instance": self.instance_id,
                "result": value.to_json(),
            }),
            _ => json!({
                "instance": self.instance_id,
                "result": value.to_json(),
            }),
        };
        envelope.to_string()
    }
}

fn passthrough(value: &TypedValue) -> Bytes {
    match value {
        TypedValue::Binary(bytes) => Bytes::from(bytes.clone()),
        TypedValue::String(s) => Bytes::from(s.clone()),
        other => Bytes::from(other.to_json_string()),
    }
}
