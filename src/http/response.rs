//! Response construction.
//!
//! # Responsibilities
//! - Turn formatted RPC results into HTTP responses
//! - Map argument and invocation failures to status codes
//!
//! # Design Decisions
//! - Non-standard statuses from the formatter (610) are sent as is
//! - Argument failures are formatted as locally produced replies
//! - Invoker failures result in 502 Bad Gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::bridge::{BridgeError, FormattedResponse, ReplyKind, ResponseFormatter, TypedValue};
use crate::rpc::InvokeError;

/// Build a response, using `default_status` when the formatter set none.
pub fn formatted(response: FormattedResponse, default_status: StatusCode) -> Response {
    let status = response
        .status
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or(default_status);
    (status, response.body).into_response()
}

/// Response for a request rejected while building its arguments.
pub fn argument_failure(formatter: &ResponseFormatter, error: &BridgeError) -> Response {
    let message = TypedValue::String(error.to_string());
    formatted(
        formatter.format(Some(&message), ReplyKind::LocalShortCircuit),
        StatusCode::BAD_REQUEST,
    )
}

/// Response for an invocation that never produced a reply.
pub fn invoke_failure(error: &InvokeError) -> Response {
    let status = match error {
        InvokeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        InvokeError::NoProvider(_) => StatusCode::SERVICE_UNAVAILABLE,
        InvokeError::Transport(_) => StatusCode::BAD_GATEWAY,
    };
    (status, error.to_string()).into_response()
}
