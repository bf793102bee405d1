//! Permission guard: bearer token → verified claims → required permission.
//!
//! Wraps a single method route. On success the `ClaimSet` is put into request
//! extensions (read it with the `Claims` extractor) and the handler runs; on
//! any failure the handler is never called.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::AppError;
use crate::services::auth::Authorizer;

#[derive(Clone)]
struct PermissionGuard {
    authorizer: Arc<Authorizer>,
    permission: &'static str,
}

/// Protect `route` so only callers holding `permission` reach it.
///
/// ```ignore
/// .route(
///     "/drinks-detail",
///     requires_auth("get:drinks-detail", authorizer.clone(), get(list_drinks_detail)),
/// )
/// ```
pub fn requires_auth<S>(
    permission: &'static str,
    authorizer: Arc<Authorizer>,
    route: MethodRouter<S>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = PermissionGuard {
        authorizer,
        permission,
    };
    // route_layer: unmatched methods still get 405, not 401
    route.route_layer(middleware::from_fn_with_state(guard, permission_guard))
}

async fn permission_guard(
    State(guard): State<PermissionGuard>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Body is not Sync; only the head is borrowed across the key fetch.
    let (mut parts, body) = req.into_parts();

    let claims = match guard
        .authorizer
        .authorize(&parts.headers, guard.permission)
        .await
    {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                permission = guard.permission,
                method = %parts.method,
                path = %parts.uri.path(),
                "authorization rejected"
            );
            return Err(err.into());
        }
    };

    // guard → extractor
    parts.extensions.insert(claims);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
