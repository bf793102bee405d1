//! Shared helpers for integration tests: signed tokens and an app wired to
//! the fixture key set (no network).
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use coffee_shop::app;
use coffee_shop::repos::drinks::{DrinkRepo, InMemoryDrinkRepo};
use coffee_shop::services::auth::{
    Authorizer, AuthSettings, CachePolicy, KeySet, StaticJwks, TokenVerifier,
};
use coffee_shop::state::AppState;

pub const ISSUER: &str = "https://coffee-shop.test/";
pub const AUDIENCE: &str = "coffee";
pub const PRIMARY_KID: &str = "primary-key";

pub const PRIMARY_PEM: &str = include_str!("../fixtures/rsa_primary.pem");
pub const ROGUE_PEM: &str = include_str!("../fixtures/rsa_rogue.pem");
pub const JWKS: &str = include_str!("../fixtures/jwks.json");
pub const JWKS_ROTATED: &str = include_str!("../fixtures/jwks_rotated.json");

pub fn now() -> u64 {
    jsonwebtoken::get_current_timestamp()
}

/// Claims a barista/manager token would carry; tweak per test.
pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "sub": "auth0|barista",
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

pub fn sign_with(pem: &str, kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_owned);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture key");
    jsonwebtoken::encode(&header, claims, &key).expect("sign")
}

pub fn sign(claims: &Value) -> String {
    sign_with(PRIMARY_PEM, Some(PRIMARY_KID), claims)
}

pub fn token_with(permissions: &[&str]) -> String {
    sign(&claims(permissions))
}

pub fn key_set(doc: &str) -> KeySet {
    KeySet::from_json(doc.as_bytes()).expect("fixture jwks")
}

pub fn settings() -> AuthSettings {
    AuthSettings {
        issuer: ISSUER.into(),
        audience: AUDIENCE.into(),
        algorithms: vec![Algorithm::RS256],
        leeway_seconds: 0,
    }
}

pub fn authorizer() -> Arc<Authorizer> {
    let verifier = TokenVerifier::new(
        Arc::new(StaticJwks::new(key_set(JWKS))),
        CachePolicy::disabled(),
        &settings(),
    );
    Arc::new(Authorizer::new(verifier))
}

pub fn state_with(drinks: Arc<dyn DrinkRepo>) -> AppState {
    AppState::new(authorizer(), drinks)
}

pub fn test_app() -> Router {
    app::router(state_with(Arc::new(InMemoryDrinkRepo::new())))
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn json_body(res: Response<Body>) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
