//! Outbound RPC seam.
//!
//! # Data Flow
//! ```text
//! http handler
//!     → RpcCall (target, declared types, typed arguments, attachments)
//!     → RpcInvoker::invoke (codec + transport live behind this trait)
//!     → RpcReply (value or exception) | InvokeError
//! ```
//!
//! # Design Decisions
//! - The wire codec and connection management are not part of this crate
//! - Invokers return boxed futures so they can be held as trait objects
//! - An application exception is a successful reply with `ReplyKind::Exception`

pub mod loopback;

use std::collections::HashMap;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::bridge::{ReplyKind, RpcTarget, TypedValue};

pub use loopback::LoopbackInvoker;

/// A fully built RPC invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    pub target: RpcTarget,
    /// Declared nominal types, aligned with `arguments`.
    pub parameter_types: Vec<String>,
    pub arguments: Vec<Option<TypedValue>>,
    pub attachments: HashMap<String, String>,
}

/// Result of a completed invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcReply {
    pub value: Option<TypedValue>,
    pub kind: ReplyKind,
}

impl RpcReply {
    pub fn normal(value: Option<TypedValue>) -> Self {
        Self {
            value,
            kind: ReplyKind::Normal,
        }
    }

    pub fn exception(value: TypedValue) -> Self {
        Self {
            value: Some(value),
            kind: ReplyKind::Exception,
        }
    }

    pub fn local(value: TypedValue) -> Self {
        Self {
            value: Some(value),
            kind: ReplyKind::LocalShortCircuit,
        }
    }
}

/// Failure to complete an invocation at all.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("no provider available for {0}")]
    NoProvider(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invocation timed out after {0} ms")]
    Timeout(u64),
}

/// Performs RPC calls on behalf of the HTTP layer.
pub trait RpcInvoker: Send + Sync {
    fn invoke(&self, call: RpcCall) -> BoxFuture<'static, Result<RpcReply, InvokeError>>;
}
