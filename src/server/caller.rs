//! Caller identity extraction.
//!
//! The `X-User-Id` header is trusted as given; this service performs no
//! authentication of its own. Deploy it behind a proxy or session layer
//! that authenticates every `/api` call and overwrites the header, or
//! strips it when no session is present. The public `/webhook` routes
//! share the same listener, so a client reaching the service directly
//! could otherwise act as any user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::ApiError;
use crate::model::UserId;

/// Header carrying the authenticated user id, set by the session layer in
/// front of this service.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}
