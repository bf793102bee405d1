/// Factory: build the `Authorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    Authorizer,
    jwks::{HttpJwksFetcher, JwksError},
    key_cache::CachePolicy,
    verifier::{AuthSettings, TokenVerifier},
};

pub fn build_authorizer(config: &Config) -> Result<Arc<Authorizer>, JwksError> {
    let fetcher = HttpJwksFetcher::new(config.auth_jwks_url.clone(), config.jwks_fetch_timeout)?;

    let settings = AuthSettings {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        algorithms: config.auth_algorithms.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    };

    let cache = CachePolicy {
        ttl: config.jwks_cache_ttl,
        min_refresh_interval: config.jwks_min_refresh_interval,
    };

    let verifier = TokenVerifier::new(Arc::new(fetcher), cache, &settings);

    Ok(Arc::new(Authorizer::new(verifier)))
}
