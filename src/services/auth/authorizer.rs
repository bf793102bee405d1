use axum::http::HeaderMap;
use tracing::debug;

use crate::services::auth::{
    claims::{ClaimSet, check_permission},
    error::AuthError,
    header::extract_token,
    verifier::TokenVerifier,
};

/// Bearer token authorizer: header → key → claims → permission.
///
/// Every stage short-circuits; the claim set is only handed out once the
/// required permission has been found in it.
#[derive(Debug)]
pub struct Authorizer {
    verifier: TokenVerifier,
}

impl Authorizer {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        required: &str,
    ) -> Result<ClaimSet, AuthError> {
        let token = extract_token(headers)?;
        let claims = self.verifier.verify_token(&token).await?;
        check_permission(required, &claims)?;

        debug!(
            sub = claims.sub.as_deref().unwrap_or("-"),
            permission = required,
            expires_at = ?claims.expires_at(),
            "request authorized"
        );

        Ok(claims)
    }
}
