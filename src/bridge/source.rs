//! Argument source selection.
//!
//! # Responsibilities
//! - Decide per request whether arguments come from the body or the query
//! - Pick the body resolver kind from the content type
//!
//! # Design Decisions
//! - GET with known names honours a configured body only when one was sent
//! - Other methods prefer the side that actually carries data; the
//!   configured side wins ties
//! - Content-type matching is a case-insensitive substring test

use crate::bridge::descriptor::{ArgumentSource, CallDescriptor};
use crate::bridge::request::RequestSnapshot;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const TEXT_PLAIN: &str = "text/plain";

/// Shape of the request body as far as argument parsing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
    Text,
}

/// Resolve the effective argument source for this request.
pub fn select_source(descriptor: &CallDescriptor, request: &RequestSnapshot<'_>) -> ArgumentSource {
    let configured = descriptor.argument_source();
    let has_body = !request.body().is_empty();
    let has_query = !request.query().is_empty();

    let selected = if request.is_get() {
        if !descriptor.parameter_names_unknown() && configured == ArgumentSource::Body && has_body {
            ArgumentSource::Body
        } else {
            ArgumentSource::Query
        }
    } else {
        match configured {
            ArgumentSource::Body if !has_body && has_query => ArgumentSource::Query,
            ArgumentSource::Query if !has_query && has_body => ArgumentSource::Body,
            other => other,
        }
    };

    if selected != configured {
        tracing::debug!(
            method = %request.method(),
            configured = configured.as_str(),
            selected = selected.as_str(),
            "Argument source downgraded"
        );
    }
    selected
}

/// Sniff the body format from the `Content-Type` header.
pub fn body_format(content_type: Option<&str>) -> BodyFormat {
    let Some(content_type) = content_type else {
        return BodyFormat::Json;
    };
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains(FORM_URLENCODED) {
        BodyFormat::Form
    } else if content_type.contains(TEXT_PLAIN) {
        BodyFormat::Text
    } else {
        BodyFormat::Json
    }
}
