/*
 * Responsibility
 * - `/drinks/{drink_id}` path segment → positive integer id
 * - anything else is treated as a route that does not exist (404), not a bad request
 */
use axum::extract::{FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrinkId(pub i64);

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

impl<S> FromRequestParts<S> for DrinkId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        parse_id(&raw).map(Self).ok_or(AppError::NotFound)
    }
}

/// Route layer: a malformed id is a 404 before the permission guard runs,
/// as if the route did not match.
pub async fn require_drink_id(_: DrinkId, req: Request, next: Next) -> Response {
    next.run(req).await
}
