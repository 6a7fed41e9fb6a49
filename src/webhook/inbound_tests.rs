//! Tests for `InboundRequest` snapshots.

use http::header::{HeaderValue, USER_AGENT};

use super::InboundRequest;

#[test]
fn query_keeps_first_value_per_key() {
    let request =
        InboundRequest::new(http::Method::GET, "/webhook/t").with_query("a=1&b=two%20words&a=2");

    let query = request.query_map();

    assert_eq!(query.len(), 2);
    assert_eq!(query["a"], "1");
    assert_eq!(query["b"], "two words");
}

#[test]
fn missing_query_is_empty() {
    assert!(
        InboundRequest::new(http::Method::GET, "/webhook/t")
            .query_map()
            .is_empty()
    );
}

#[test]
fn headers_keep_first_value_per_name() {
    let mut request = InboundRequest::new(http::Method::POST, "/webhook/t");
    request
        .headers
        .append("x-tag", HeaderValue::from_static("first"));
    request
        .headers
        .append("x-tag", HeaderValue::from_static("second"));

    let headers = request.header_map();

    assert_eq!(headers["x-tag"], "first");
}

#[test]
fn user_agent_defaults_to_empty() {
    let plain = InboundRequest::new(http::Method::POST, "/webhook/t");
    let agent = plain
        .clone()
        .with_header(USER_AGENT, HeaderValue::from_static("curl/8.0"));

    assert_eq!(plain.user_agent(), "");
    assert_eq!(agent.user_agent(), "curl/8.0");
}

#[test]
fn body_text_is_lossy() {
    let request =
        InboundRequest::new(http::Method::POST, "/webhook/t").with_body(vec![b'h', b'i', 0xfe]);

    assert_eq!(request.body_text_lossy(), "hi\u{fffd}");
}
