//! Read-only view over one buffered inbound request.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, Request, Uri};

/// Borrowed snapshot of the parts of an HTTP request the bridge reads.
#[derive(Debug, Clone, Copy)]
pub struct RequestSnapshot<'a> {
    method: &'a Method,
    uri: &'a Uri,
    headers: &'a HeaderMap,
    body: &'a [u8],
}

impl<'a> RequestSnapshot<'a> {
    pub fn new(method: &'a Method, uri: &'a Uri, headers: &'a HeaderMap, body: &'a [u8]) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
        }
    }

    /// Snapshot a request whose body is already buffered.
    pub fn of(request: &'a Request<Bytes>) -> Self {
        Self::new(request.method(), request.uri(), request.headers(), request.body())
    }

    pub fn method(&self) -> &Method {
        self.method
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Header value by name; non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Iterate headers whose (lowercase) name starts with `prefix`.
    pub fn headers_with_prefix(&self, prefix: &str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let prefix_lower = prefix.to_ascii_lowercase();
        let headers: &'a HeaderMap = self.headers;
        headers.iter().filter_map(move |(name, value)| {
            let name = name.as_str();
            if !name.starts_with(prefix_lower.as_str()) {
                return None;
            }
            match value.to_str() {
                Ok(v) => Some((name, v)),
                Err(_) => {
                    tracing::debug!(header = %name, "Skipping non-UTF-8 header value");
                    None
                }
            }
        })
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    pub fn path(&self) -> &'a str {
        self.uri.path()
    }

    /// Raw query string without the leading `?`; empty if none.
    pub fn query(&self) -> &'a str {
        self.uri.query().unwrap_or("")
    }

    pub fn content_type(&self) -> Option<&'a str> {
        self.header(header::CONTENT_TYPE.as_str())
    }
}
