//! Snapshot of an inbound webhook call.

use std::collections::HashMap;
use std::net::SocketAddr;

use http::header::{HeaderMap, USER_AGENT};
use tokio::time::Instant;

/// An inbound call as handed over by the serving layer.
///
/// The body has already been read in full; `received_at` marks when the
/// call arrived, before the body was read.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: http::Method,
    /// Request path without the query string.
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Peer address of the connection, when known.
    pub remote_addr: Option<SocketAddr>,
    pub received_at: Instant,
}

impl InboundRequest {
    /// Creates a request with no query, headers, body or peer address,
    /// received now.
    #[must_use]
    pub fn new(method: http::Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            remote_addr: None,
            received_at: Instant::now(),
        }
    }

    /// Sets the raw query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets a header, replacing any existing values for the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the peer address.
    #[must_use]
    pub const fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Decoded query parameters, keeping the first value of each key.
    #[must_use]
    pub fn query_map(&self) -> HashMap<String, String> {
        let mut query = HashMap::new();
        if let Some(raw) = &self.query {
            for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                query
                    .entry(key.into_owned())
                    .or_insert_with(|| value.into_owned());
            }
        }
        query
    }

    /// Headers keyed by lowercase name, keeping the first value of each.
    #[must_use]
    pub fn header_map(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        for (name, value) in &self.headers {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
        headers
    }

    /// The `User-Agent` header, or an empty string.
    #[must_use]
    pub fn user_agent(&self) -> String {
        self.headers
            .get(USER_AGENT)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default()
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
