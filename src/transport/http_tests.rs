//! Tests for the outbound call values.

use std::error::Error;

use http::header::{HeaderMap, HeaderValue, SET_COOKIE};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

fn response_with(headers: HeaderMap, body: &[u8]) -> HttpResponse {
    HttpResponse::new(http::StatusCode::OK, headers, body.to_vec())
}

#[test]
fn new_request_has_no_body() {
    let url = url::Url::parse("https://api.example.com/users").unwrap();
    let req = HttpRequest::new(http::Method::DELETE, url);

    assert_eq!(req.method, http::Method::DELETE);
    assert!(req.headers.is_empty());
    assert!(req.body.is_none());
}

mod first_header_values {
    use super::*;

    #[test]
    fn repeated_header_keeps_first_value() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("session=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark"));

        let flat = response_with(headers, b"").first_header_values();

        assert_eq!(flat.len(), 1);
        assert_eq!(flat["set-cookie"], "session=1");
    }

    #[test]
    fn names_are_lowercase() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::HeaderName::from_bytes(b"X-Request-Id").unwrap(),
            HeaderValue::from_static("abc"),
        );

        let flat = response_with(headers, b"").first_header_values();

        assert_eq!(flat["x-request-id"], "abc");
    }

    #[test]
    fn opaque_bytes_are_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert("x-raw", HeaderValue::from_bytes(&[b'o', b'k', 0xFF]).unwrap());

        let flat = response_with(headers, b"").first_header_values();

        assert_eq!(flat["x-raw"], "ok\u{FFFD}");
    }
}

#[test]
fn body_text_lossy_replaces_invalid_utf8() {
    let resp = response_with(HeaderMap::new(), &[b'{', 0xC3, b'}']);

    assert_eq!(resp.body_text_lossy(), "{\u{FFFD}}");
}

mod http_error {
    use super::*;

    #[test]
    fn connection_error_keeps_source() {
        let error = HttpError::Connection(Box::new(std::io::Error::other("dns lookup failed")));

        assert!(error.to_string().starts_with("Connection error"));
        assert_eq!(error.source().unwrap().to_string(), "dns lookup failed");
    }

    #[test]
    fn invalid_request_has_no_source() {
        let error = HttpError::InvalidRequest("relative URL without a base".to_string());

        assert_eq!(
            error.to_string(),
            "Invalid request: relative URL without a base"
        );
        assert!(error.source().is_none());
    }
}

#[tokio::test]
async fn shared_client_forwards_calls() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl HttpClient for Counting {
        async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::new(
                http::StatusCode::NO_CONTENT,
                HeaderMap::new(),
                Vec::new(),
            ))
        }
    }

    let inner = Arc::new(Counting::default());
    let shared = Arc::clone(&inner);
    let url = url::Url::parse("https://api.example.com/").unwrap();

    let response = shared
        .request(HttpRequest::new(http::Method::GET, url))
        .await
        .unwrap();

    assert_eq!(response.status, http::StatusCode::NO_CONTENT);
    assert_eq!(inner.0.load(Ordering::SeqCst), 1);
}
