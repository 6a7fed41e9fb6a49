//! Outbound credential injection.
//!
//! Maps a stored [`Auth`] descriptor onto request headers. Missing or
//! unusable credentials leave the request unauthenticated rather than
//! failing it, so malformed saved requests still execute.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use crate::model::{Auth, AuthType};

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

/// Applies `auth` to `headers`, replacing any header of the same name.
///
/// - `bearer`: `Authorization: Bearer <token>` when `token` is present
/// - `basic`: `Authorization: Basic base64(username:password)` when both are present
/// - `apikey`: `<header>: <key>` when both are present
/// - `none`: nothing
pub fn apply(auth: &Auth, headers: &mut HeaderMap) {
    match auth.kind {
        AuthType::None => {}
        AuthType::Bearer => {
            if let Some(token) = auth.credential("token") {
                set(headers, AUTHORIZATION, &format!("Bearer {token}"));
            }
        }
        AuthType::Basic => {
            if let (Some(username), Some(password)) =
                (auth.credential("username"), auth.credential("password"))
            {
                set(headers, AUTHORIZATION, &basic_credentials(username, password));
            }
        }
        AuthType::ApiKey => {
            if let (Some(key), Some(header)) = (auth.credential("key"), auth.credential("header"))
            {
                match HeaderName::from_bytes(header.as_bytes()) {
                    Ok(name) => set(headers, name, key),
                    Err(e) => tracing::debug!(header, error = %e, "Skipping API key with invalid header name"),
                }
            }
        }
    }
}

/// Encodes an RFC 7617 basic credentials header value.
#[must_use]
pub fn basic_credentials(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn set(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => tracing::debug!(header = %name, error = %e, "Skipping credential with invalid header value"),
    }
}
