/*
 * Responsibility
 * - Authorization failure taxonomy (one variant per rejection point in the guard)
 * - Fixed HTTP status + machine-readable code per kind (callers never pick the status)
 * - Display text is the client-facing description; it never carries library error details
 */
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization is not present in the request headers.")]
    MissingHeader,
    #[error("Malformed Authorization header.")]
    MalformedHeader,
    #[error("Authorization header does not contain Bearer token.")]
    NotBearerScheme,
    #[error("Authorization token header does not carry a key id.")]
    MissingKeyId,
    #[error("Unable to find the appropriate key.")]
    UnknownSigningKey,
    #[error("Signing keys are temporarily unavailable.")]
    KeySetUnavailable,
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    #[error("Unable to parse authentication token.")]
    UnparseableToken,
    #[error("No permission(s) were included in payload. User is not allowed to access resource.")]
    NoPermissionsInClaims,
    #[error("Access Forbidden. User is not allowed to access resource.")]
    PermissionDenied,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingHeader
            | Self::MalformedHeader
            | Self::NotBearerScheme
            | Self::MissingKeyId
            | Self::TokenExpired
            | Self::InvalidClaims
            | Self::UnparseableToken => StatusCode::UNAUTHORIZED,
            // "can't find key" is reported apart from bad credentials
            Self::UnknownSigningKey => StatusCode::BAD_REQUEST,
            Self::KeySetUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::NoPermissionsInClaims | Self::PermissionDenied => StatusCode::FORBIDDEN,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader
            | Self::MalformedHeader
            | Self::NotBearerScheme
            | Self::MissingKeyId
            | Self::UnknownSigningKey
            | Self::UnparseableToken => "invalid_header",
            Self::KeySetUnavailable => "jwks_unavailable",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::NoPermissionsInClaims | Self::PermissionDenied => "invalid_permission",
        }
    }

    /// Stable name of the failure kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::NotBearerScheme => "not_bearer_scheme",
            Self::MissingKeyId => "missing_key_id",
            Self::UnknownSigningKey => "unknown_signing_key",
            Self::KeySetUnavailable => "key_set_unavailable",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::UnparseableToken => "unparseable_token",
            Self::NoPermissionsInClaims => "no_permissions_in_claims",
            Self::PermissionDenied => "permission_denied",
        }
    }
}
