//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one handler per route)
//!     → request.rs (request ID)
//!     → buffer body, bridge::ArgumentGetter builds the call
//!     → rpc::RpcInvoker performs it
//!     → response.rs (formatted reply or failure → status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
