//! Inbound credential checks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::{AUTHORIZATION, HeaderMap};

use crate::model::{WebhookAuth, WebhookAuthKind};

/// Returns `true` if `headers` satisfy the endpoint's authentication.
///
/// Callers only consult this when `auth.enabled` is set.
///
/// `signature` is accepted without verification, and so is any scheme
/// this build does not recognize.
#[must_use]
pub fn verify(auth: &WebhookAuth, headers: &HeaderMap) -> bool {
    match auth.kind {
        WebhookAuthKind::Basic => basic_credentials(headers)
            .is_some_and(|(user, pass)| user == auth.username && pass == auth.password),
        WebhookAuthKind::Bearer => authorization(headers)
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token == auth.token),
        WebhookAuthKind::Signature => {
            tracing::debug!("Signature verification is not implemented, accepting call");
            true
        }
        WebhookAuthKind::Unknown => {
            tracing::warn!("Unrecognized webhook authentication type, accepting call");
            true
        }
        WebhookAuthKind::None => true,
    }
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)?.to_str().ok()
}

/// Decodes `Authorization: Basic …` into a username and password.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = authorization(headers)?;
    let (scheme, encoded) = value.split_at_checked(6)?;
    if !scheme.eq_ignore_ascii_case("basic ") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
