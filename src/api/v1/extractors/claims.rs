use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::ClaimSet;

/// Verified claims of the caller, for handlers behind `requires_auth`.
///
/// The permission guard inserts the `ClaimSet` into request extensions after
/// a successful check. Missing means the route is not guarded: 401.
#[derive(Debug, Clone)]
pub struct Claims(pub ClaimSet);

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClaimSet>()
            .cloned()
            .map(Claims)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
