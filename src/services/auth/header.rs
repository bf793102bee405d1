//! `Authorization: Bearer <token>` extraction.
//!
//! Only the shape of the header is checked here; the token itself is opaque
//! until it reaches the verifier.

use axum::http::{HeaderMap, header};

use crate::services::auth::error::AuthError;

/// Bearer credential taken from the request.
///
/// Debug output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Pull the bearer token out of the request headers.
///
/// The value must split (on whitespace) into exactly two parts, the first one
/// being `bearer` in any case. The second part is returned as-is.
pub fn extract_token(headers: &HeaderMap) -> Result<BearerToken, AuthError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    // Non visible-ASCII values can't carry a compact JWS anyway.
    let value = raw.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::NotBearerScheme);
    }

    Ok(BearerToken::new(token))
}
