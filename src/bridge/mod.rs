//! HTTP-to-RPC argument bridging.
//!
//! # Data Flow
//! ```text
//! RequestSnapshot + CallDescriptor
//!     → getter.rs (attachments, resolver selection)
//!     → source.rs (body/query downgrade, content-type sniffing)
//!     → resolver/* (per-parameter lookup)
//!     → convert.rs / json.rs (text and JSON to TypedValue)
//!     → Vec<Option<TypedValue>> + attachments → RPC layer
//!
//! RPC result
//!     → response.rs (plain / envelope / gateway)
//!     → body + optional status → HTTP layer
//! ```
//!
//! # Design Decisions
//! - Everything here is synchronous in-memory work over buffered bytes
//! - Per-request state lives in the getter and is dropped with the request
//! - Descriptors and formatters are immutable and shared freely

pub mod convert;
pub mod descriptor;
pub mod error;
pub mod getter;
pub mod json;
pub mod request;
pub mod resolver;
pub mod response;
pub mod source;
pub mod value;

pub use descriptor::{ArgumentSource, CallDescriptor, Parameter, RpcTarget};
pub use error::BridgeError;
pub use getter::{ArgumentGetter, DEFAULT_ATTACHMENT_PREFIX};
pub use request::RequestSnapshot;
pub use response::{FormattedResponse, ReplyKind, ResponseFlavor, ResponseFormatter};
pub use value::TypedValue;
