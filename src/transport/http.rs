//! Outbound call values and the client seam.

use std::collections::HashMap;

use super::HttpError;

/// One outbound call, ready to dispatch.
///
/// Built by the executor from a stored request; the transport sends it
/// exactly as given.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    pub url: url::Url,
    pub headers: http::HeaderMap,
    /// `None` sends no body at all, which servers may treat differently
    /// from an empty one.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A call with no headers and no body.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }
}

/// Whatever the remote server answered, body fully drained.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: http::StatusCode,
    /// Every header as received, repeated names included.
    pub headers: http::HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Flattens the headers to one value per name, keeping the first one
    /// received. Names are lowercase.
    #[must_use]
    pub fn first_header_values(&self) -> HashMap<String, String> {
        let mut headers = HashMap::with_capacity(self.headers.keys_len());
        for (name, value) in &self.headers {
            headers
                .entry(name.as_str().to_string())
                .or_insert_with(|| String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
        headers
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends outbound calls.
///
/// The executor only sees this trait; production wires in
/// [`ReqwestClient`](super::ReqwestClient), tests wire in scripted clients.
/// Implementations return once the body has been read in full, so a
/// caller's timing covers the drain, and report any status code as `Ok`.
pub trait HttpClient: Send + Sync {
    /// Sends `req` and drains the response.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Connection`] for DNS, connect, TLS or body-read failures
    /// - [`HttpError::Timeout`] once the client's call bound elapses
    /// - [`HttpError::InvalidRequest`] if the call is refused before any I/O
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req)
    }
}
