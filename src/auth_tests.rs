//! Tests for outbound credential injection.

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::{apply, basic_credentials};
use crate::model::{Auth, AuthType};

fn applied(auth: &Auth) -> HeaderMap {
    let mut headers = HeaderMap::new();
    apply(auth, &mut headers);
    headers
}

mod complete_credentials {
    use super::*;

    #[test]
    fn bearer_sets_authorization_only() {
        let headers = applied(&Auth::new(AuthType::Bearer, [("token", "abc123")]));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[test]
    fn basic_sets_encoded_credentials_only() {
        let headers = applied(&Auth::new(
            AuthType::Basic,
            [("username", "aladdin"), ("password", "opensesame")],
        ));

        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get(AUTHORIZATION).unwrap(),
            "Basic YWxhZGRpbjpvcGVuc2VzYW1l"
        );
    }

    #[test]
    fn apikey_sets_named_header_only() {
        let headers = applied(&Auth::new(
            AuthType::ApiKey,
            [("key", "s3cr3t"), ("header", "X-Api-Key")],
        ));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-api-key").unwrap(), "s3cr3t");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn auth_overrides_same_named_stored_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token stale"));

        apply(&Auth::new(AuthType::Bearer, [("token", "fresh")]), &mut headers);

        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer fresh");
    }
}

mod degraded_credentials {
    use super::*;

    #[test]
    fn none_adds_nothing_even_with_credentials() {
        let headers = applied(&Auth::new(AuthType::None, [("token", "ignored")]));

        assert!(headers.is_empty());
    }

    #[test]
    fn none_leaves_explicit_authorization_untouched() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Custom xyz"));

        apply(&Auth::default(), &mut headers);

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Custom xyz");
    }

    #[test]
    fn bearer_without_token_is_noop() {
        assert!(applied(&Auth::new(AuthType::Bearer, [("username", "x")])).is_empty());
    }

    #[test]
    fn basic_without_password_is_noop() {
        assert!(applied(&Auth::new(AuthType::Basic, [("username", "x")])).is_empty());
    }

    #[test]
    fn apikey_without_header_name_is_noop() {
        assert!(applied(&Auth::new(AuthType::ApiKey, [("key", "x")])).is_empty());
    }

    #[test]
    fn apikey_with_invalid_header_name_is_skipped() {
        let headers = applied(&Auth::new(
            AuthType::ApiKey,
            [("key", "x"), ("header", "bad header")],
        ));

        assert!(headers.is_empty());
    }

    #[test]
    fn bearer_with_control_characters_is_skipped() {
        let headers = applied(&Auth::new(AuthType::Bearer, [("token", "a\nb")]));

        assert!(headers.is_empty());
    }
}

#[test]
fn basic_credentials_allows_empty_password() {
    assert_eq!(basic_credentials("user", ""), "Basic dXNlcjo=");
}
