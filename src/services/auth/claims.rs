use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::auth::error::AuthError;

/// Verified access token payload.
///
/// Only produced by the verifier after signature + `exp`/`iss`/`aud` checks
/// passed, so holding one means the token was valid at verification time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSet {
    pub iss: String,
    // string or array of strings; the verifier already matched it
    #[serde(default)]
    pub aud: serde_json::Value,
    pub exp: u64,

    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,

    // Auth0 RBAC: granted permission strings, e.g. "post:drinks"
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl ClaimSet {
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or_default()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.exp).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Check that `required` is one of the granted permissions (exact match).
///
/// A missing and an empty `permissions` claim are treated the same.
pub fn check_permission(required: &str, claims: &ClaimSet) -> Result<(), AuthError> {
    let granted = claims.permissions();

    if granted.is_empty() {
        return Err(AuthError::NoPermissionsInClaims);
    }

    if granted.iter().any(|p| p == required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}
