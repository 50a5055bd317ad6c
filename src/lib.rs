//! HTTP-to-RPC bridge library.
//!
//! Turns inbound HTTP requests into typed RPC argument lists and RPC
//! results back into HTTP responses.

pub mod bridge;
pub mod config;
pub mod http;
pub mod observability;
pub mod rpc;

pub use bridge::{ArgumentGetter, BridgeError, CallDescriptor, ResponseFormatter, TypedValue};
pub use config::BridgeConfig;
pub use http::HttpServer;
pub use rpc::{LoopbackInvoker, RpcInvoker};
