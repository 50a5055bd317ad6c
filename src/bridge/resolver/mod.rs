//! Argument resolvers.
//!
//! # Data Flow
//! ```text
//! RequestSnapshot + CallDescriptor
//!     → source.rs picks body or query, then the body format
//!     → one resolver parses its source once at construction
//!     → get_argument(parameter) per declared parameter
//!     → Some(TypedValue) | None (absent)
//! ```
//!
//! # Design Decisions
//! - One resolver per request, never shared across requests
//! - Construction fails fast on configurations the source cannot serve
//! - Absent is a successful outcome; the caller decides if it is acceptable

pub mod envelope;
pub mod form;
pub mod json_body;
pub mod query;
pub mod text;

pub use envelope::EnvelopeResolver;
pub use form::FormResolver;
pub use json_body::JsonBodyResolver;
pub use query::QueryResolver;
pub use text::TextResolver;

use crate::bridge::descriptor::Parameter;
use crate::bridge::error::Result;
use crate::bridge::value::TypedValue;

/// Fetches one declared parameter's value from a request representation.
pub trait ResolveArgument {
    /// Returns `Ok(None)` when the request supplies no value for `parameter`.
    fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>>;
}

/// The resolver chosen for a request.
#[derive(Debug)]
pub enum Resolver {
    /// The call declares no parameters.
    Empty,
    Query(QueryResolver),
    Form(FormResolver),
    Json(JsonBodyResolver),
    Text(TextResolver),
    Envelope(EnvelopeResolver),
}

impl Resolver {
    pub fn kind(&self) -> &'static str {
        match self {
            Resolver::Empty => "empty",
            Resolver::Query(_) => "query",
            Resolver::Form(_) => "form",
            Resolver::Json(_) => "json",
            Resolver::Text(_) => "text",
            Resolver::Envelope(_) => "envelope",
        }
    }
}

impl ResolveArgument for Resolver {
    fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        match self {
            Resolver::Empty => Ok(None),
            Resolver::Query(r) => r.get_argument(parameter),
            Resolver::Form(r) => r.get_argument(parameter),
            Resolver::Json(r) => r.get_argument(parameter),
            Resolver::Text(r) => r.get_argument(parameter),
            Resolver::Envelope(r) => r.get_argument(parameter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resolver_is_always_absent() {
        let resolver = Resolver::Empty;
        assert_eq!(resolver.get_argument(&Parameter::new("a", "int", 0)), Ok(None));
        assert_eq!(resolver.kind(), "empty");
    }
}
