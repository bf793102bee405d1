pub mod authorizer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod header;
pub mod jwks;
pub mod key_cache;
pub mod verifier;

pub use authorizer::Authorizer;
pub use claims::{ClaimSet, check_permission};
pub use error::AuthError;
pub use factory::build_authorizer;
pub use header::{BearerToken, extract_token};
pub use jwks::{
    HttpJwksFetcher, JwksError, JwksFetcher, KeySet, SigningKey, StaticJwks, VerificationKey,
};
pub use key_cache::{CachePolicy, KeySetCache};
pub use verifier::{AuthSettings, TokenVerifier};
