//! Per-request argument getter.
//!
//! # Responsibilities
//! - Collect attachment metadata (prefixed headers, or the envelope's `attachments`)
//! - Pick and construct exactly one resolver for the request
//! - Produce the ordered argument list for the RPC call
//!
//! # Design Decisions
//! - Calls without parameters never touch the body
//! - Downgrade runs before content-type sniffing; sniffing only applies to body sources
//! - No partial argument list: the first failing parameter aborts the request

use std::collections::HashMap;

use crate::bridge::descriptor::{ArgumentSource, CallDescriptor, Parameter};
use crate::bridge::error::Result;
use crate::bridge::request::RequestSnapshot;
use crate::bridge::resolver::{
    EnvelopeResolver, FormResolver, JsonBodyResolver, QueryResolver, ResolveArgument, Resolver,
    TextResolver,
};
use crate::bridge::source::{body_format, select_source, BodyFormat};
use crate::bridge::value::TypedValue;

/// Header prefix forwarded as attachments unless configured otherwise.
pub const DEFAULT_ATTACHMENT_PREFIX: &str = "x-nsf-";

/// Owns the resolver and attachments for one request.
#[derive(Debug)]
pub struct ArgumentGetter {
    resolver: Resolver,
    attachments: HashMap<String, String>,
}

impl ArgumentGetter {
    /// Standard profile: arguments from query, form, text or JSON body.
    pub fn new(
        descriptor: &CallDescriptor,
        request: &RequestSnapshot<'_>,
        attachment_prefix: Option<&str>,
    ) -> Result<Self> {
        let attachments = match attachment_prefix {
            Some(prefix) if !prefix.is_empty() => request
                .headers_with_prefix(prefix)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            _ => HashMap::new(),
        };

        if descriptor.parameters().is_empty() {
            return Ok(Self {
                resolver: Resolver::Empty,
                attachments,
            });
        }

        let resolver = match select_source(descriptor, request) {
            ArgumentSource::Query => Resolver::Query(QueryResolver::new(descriptor, request.query())?),
            ArgumentSource::Body => {
                let body = request.body();
                match body_format(request.content_type()) {
                    BodyFormat::Form => Resolver::Form(FormResolver::new(descriptor, body)?),
                    BodyFormat::Text => Resolver::Text(TextResolver::new(descriptor, body)?),
                    BodyFormat::Json => Resolver::Json(JsonBodyResolver::new(descriptor, body)?),
                }
            }
        };

        tracing::debug!(
            resolver = resolver.kind(),
            params = descriptor.parameters().len(),
            attachments = attachments.len(),
            "Argument resolver selected"
        );
        Ok(Self {
            resolver,
            attachments,
        })
    }

    /// Gateway profile: the body is a `paramValues`/`attachments` envelope.
    pub fn from_envelope(descriptor: &CallDescriptor, request: &RequestSnapshot<'_>) -> Result<Self> {
        if descriptor.parameters().is_empty() && request.body().is_empty() {
            return Ok(Self {
                resolver: Resolver::Empty,
                attachments: HashMap::new(),
            });
        }

        let mut envelope = EnvelopeResolver::new(descriptor, request.body())?;
        let attachments = envelope.take_attachments();
        Ok(Self {
            resolver: Resolver::Envelope(envelope),
            attachments,
        })
    }

    pub fn get_argument(&self, parameter: &Parameter) -> Result<Option<TypedValue>> {
        self.resolver.get_argument(parameter)
    }

    /// Resolve every declared parameter, in order.
    pub fn arguments(&self, descriptor: &CallDescriptor) -> Result<Vec<Option<TypedValue>>> {
        descriptor
            .parameters()
            .iter()
            .map(|parameter| self.get_argument(parameter))
            .collect()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn attachments(&self) -> &HashMap<String, String> {
        &self.attachments
    }

    pub fn into_attachments(self) -> HashMap<String, String> {
        self.attachments
    }
}
