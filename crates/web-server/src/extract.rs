//! Request extractors for identity resolved upstream.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};

/// The already-authenticated user id, read from the `x-user-id` header.
///
/// Sessions and credentials live in the auth gateway in front of this
/// service; by the time a request reaches these handlers its user is a
/// resolved id. A request without one cannot be served.
pub struct AuthenticatedUser(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok())
            .map(AuthenticatedUser)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "missing or malformed x-user-id header",
            ))
    }
}
