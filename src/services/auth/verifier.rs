//! Access token verification against the issuer's published keys.
//!
//! Order matters: the header is read unverified only to pick the key, and
//! nothing from the payload is trusted before `jsonwebtoken::decode` has
//! checked signature + `exp` + `iss` + `aud` together.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use tracing::warn;

use crate::services::auth::{
    claims::ClaimSet,
    error::AuthError,
    header::BearerToken,
    jwks::JwksFetcher,
    key_cache::{CachePolicy, KeySetCache},
};

/// What a token must satisfy to be accepted.
///
/// Kept independent from `Config` so it can point at a mock issuer in tests.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub issuer: String,
    pub audience: String,
    // RSA family only; keys come from RSA JWKs
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
}

impl AuthSettings {
    fn validation(&self) -> Validation {
        let first = self.algorithms.first().copied().unwrap_or(Algorithm::RS256);
        let mut validation = Validation::new(first);
        if !self.algorithms.is_empty() {
            validation.algorithms = self.algorithms.clone();
        }
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = self.leeway_seconds;
        validation
    }
}

pub struct TokenVerifier {
    keys: KeySetCache,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("keys", &self.keys)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(fetcher: Arc<dyn JwksFetcher>, cache: CachePolicy, settings: &AuthSettings) -> Self {
        Self {
            keys: KeySetCache::new(fetcher, cache),
            validation: settings.validation(),
        }
    }

    /// Verify `token` and return its claims.
    pub async fn verify_token(&self, token: &BearerToken) -> Result<ClaimSet, AuthError> {
        let header = jsonwebtoken::decode_header(token.as_str()).map_err(|e| {
            warn!(error = %e, "unreadable token header");
            AuthError::UnparseableToken
        })?;

        let kid = header
            .kid
            .filter(|k| !k.is_empty())
            .ok_or(AuthError::MissingKeyId)?;

        let key = self
            .keys
            .resolve(&kid)
            .await
            .map_err(|e| {
                warn!(error = %e, source = %self.keys.source(), "signing key set unavailable");
                AuthError::KeySetUnavailable
            })?
            .ok_or_else(|| {
                warn!(kid = %kid, "no signing key matches token kid");
                AuthError::UnknownSigningKey
            })?;

        // the key pins its algorithm when it publishes one
        if !key.accepts(header.alg) {
            warn!(
                kid = %kid,
                alg = ?header.alg,
                key_alg = ?key.jwk().alg,
                "token alg does not match key"
            );
            return Err(AuthError::UnparseableToken);
        }

        let Some(decoding_key) = key.decoding() else {
            warn!(kid = %kid, "unusable signing key");
            return Err(AuthError::UnparseableToken);
        };

        let data = jsonwebtoken::decode::<ClaimSet>(token.as_str(), decoding_key, &self.validation)
            .map_err(|e| {
                let err = classify(e.kind());
                warn!(error = %e, kind = err.kind(), "token rejected");
                err
            })?;

        Ok(data.claims)
    }
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::ImmatureSignature => {
            AuthError::InvalidClaims
        }
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
            AuthError::InvalidClaims
        }
        _ => AuthError::UnparseableToken,
    }
}
