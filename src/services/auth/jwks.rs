//! JSON Web Key Set: document model + fetchers.
//!
//! The issuer publishes its signing keys at a well-known URL. `JwksFetcher` is
//! the seam between the verifier and wherever the keys come from; the verifier
//! never talks HTTP directly.

use std::{collections::HashMap, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::http::header;
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum JwksError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("jwks request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("jwks endpoint returned HTTP {0}")]
    Status(u16),
    #[error("invalid jwks document: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum KeyMaterialError {
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),
    #[error("key is not meant for signatures (use={0})")]
    NotForSignatures(String),
    #[error("missing RSA component: {0}")]
    MissingComponent(&'static str),
    #[error("invalid RSA components: {0}")]
    InvalidComponents(#[from] jsonwebtoken::errors::Error),
}

/// One public key from the issuer's key set.
#[derive(Debug, Clone, Deserialize)]
pub struct SigningKey {
    pub kty: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(rename = "use", default)]
    pub key_use: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    // RSA modulus / exponent (base64url, no padding)
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

impl SigningKey {
    /// `alg` as published; `None` when absent or not a known algorithm name.
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.alg.as_deref().and_then(|a| Algorithm::from_str(a).ok())
    }

    /// Build the verification key from the RSA components.
    pub fn decoding_key(&self) -> Result<DecodingKey, KeyMaterialError> {
        if self.kty != "RSA" {
            return Err(KeyMaterialError::UnsupportedKeyType(self.kty.clone()));
        }
        if let Some(key_use) = self.key_use.as_deref()
            && key_use != "sig"
        {
            return Err(KeyMaterialError::NotForSignatures(key_use.to_string()));
        }

        let n = self
            .n
            .as_deref()
            .ok_or(KeyMaterialError::MissingComponent("n"))?;
        let e = self
            .e
            .as_deref()
            .ok_or(KeyMaterialError::MissingComponent("e"))?;

        Ok(DecodingKey::from_rsa_components(n, e)?)
    }
}

/// A published key with its verification key built once, at load time.
#[derive(Clone)]
pub struct VerificationKey {
    jwk: SigningKey,
    // None: unusable key material (logged on load)
    decoding: Option<DecodingKey>,
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("jwk", &self.jwk)
            .field("usable", &self.decoding.is_some())
            .finish()
    }
}

impl VerificationKey {
    fn load(jwk: SigningKey) -> Self {
        let decoding = match jwk.decoding_key() {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(kid = ?jwk.kid, error = %e, "unusable key in key set");
                None
            }
        };
        Self { jwk, decoding }
    }

    pub fn jwk(&self) -> &SigningKey {
        &self.jwk
    }

    pub fn decoding(&self) -> Option<&DecodingKey> {
        self.decoding.as_ref()
    }

    /// Whether a token signed with `alg` may be checked with this key.
    /// A key that does not publish `alg` accepts any allowed algorithm.
    pub fn accepts(&self, alg: Algorithm) -> bool {
        match self.jwk.alg.as_deref() {
            None => true,
            Some(_) => self.jwk.algorithm() == Some(alg),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<SigningKey>,
}

/// Key set indexed by key id.
///
/// Keys without a `kid` can never be selected, so they are dropped on load.
/// A repeated `kid` keeps the first entry.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, Arc<VerificationKey>>,
}

impl KeySet {
    pub fn from_keys(keys: impl IntoIterator<Item = SigningKey>) -> Self {
        let mut indexed = HashMap::new();

        for key in keys {
            let Some(kid) = key.kid.clone().filter(|k| !k.is_empty()) else {
                continue;
            };
            if indexed.contains_key(&kid) {
                warn!(kid = %kid, "duplicate kid in key set, keeping the first one");
                continue;
            }
            indexed.insert(kid, Arc::new(VerificationKey::load(key)));
        }

        Self { keys: indexed }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, JwksError> {
        let doc: JwksDocument = serde_json::from_slice(bytes)?;
        Ok(Self::from_keys(doc.keys))
    }

    pub fn get(&self, kid: &str) -> Option<&Arc<VerificationKey>> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Source of the issuer's signing keys.
#[async_trait]
pub trait JwksFetcher: Send + Sync + 'static {
    // Where the keys come from (for logging).
    fn source(&self) -> &str;

    // Fetch the current key set. Called at most once per refresh; never retried here.
    async fn fetch(&self) -> Result<KeySet, JwksError>;
}

/// Fetches the key set over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpJwksFetcher {
    client: reqwest::Client,
    url: Url,
}

impl HttpJwksFetcher {
    /// `timeout` bounds the whole request (connect + body).
    pub fn new(url: Url, timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(JwksError::Client)?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl JwksFetcher for HttpJwksFetcher {
    fn source(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<KeySet, JwksError> {
        let res = self
            .client
            .get(self.url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(JwksError::Status(status.as_u16()));
        }

        let body = res.bytes().await?;
        KeySet::from_json(&body)
    }
}

/// Fixed key set, for locally managed keys and tests.
#[derive(Debug, Clone)]
pub struct StaticJwks {
    keys: KeySet,
}

impl StaticJwks {
    pub fn new(keys: KeySet) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl JwksFetcher for StaticJwks {
    fn source(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<KeySet, JwksError> {
        Ok(self.keys.clone())
    }
}
