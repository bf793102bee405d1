//! Time-bounded cache of the issuer's signing keys.
//!
//! - Readers share the current snapshot (`Arc<KeySet>`) under a read lock.
//! - Refresh is single-flight: one task fetches while concurrent misses wait on
//!   `refresh_lock` and then reuse the snapshot it stored.
//! - `ttl == 0` disables caching; every lookup fetches.
//! - An unknown `kid` triggers one refetch if the snapshot is older than
//!   `min_refresh_interval` (key rotation on the issuer side).

use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use crate::services::auth::jwks::{JwksError, JwksFetcher, KeySet, VerificationKey};

#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub min_refresh_interval: Duration,
}

impl CachePolicy {
    /// Fetch on every lookup.
    pub fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            min_refresh_interval: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    keys: Arc<KeySet>,
    fetched_at: Instant,
}

pub struct KeySetCache {
    fetcher: Arc<dyn JwksFetcher>,
    policy: CachePolicy,
    current: RwLock<Option<Snapshot>>,
    refresh_lock: Mutex<()>,
}

impl std::fmt::Debug for KeySetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySetCache")
            .field("source", &self.fetcher.source())
            .field("policy", &self.policy)
            .finish()
    }
}

impl KeySetCache {
    pub fn new(fetcher: Arc<dyn JwksFetcher>, policy: CachePolicy) -> Self {
        Self {
            fetcher,
            policy,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &str {
        self.fetcher.source()
    }

    /// Find the key for `kid`.
    ///
    /// - `Ok(Some(_))`: key found (possibly after a refresh)
    /// - `Ok(None)`: the issuer does not publish this key
    /// - `Err(_)`: the key set could not be fetched
    pub async fn resolve(&self, kid: &str) -> Result<Option<Arc<VerificationKey>>, JwksError> {
        if self.policy.ttl.is_zero() {
            let keys = self.fetch().await?;
            return Ok(keys.get(kid).cloned());
        }

        let snapshot = match self.fresh_snapshot().await {
            Some(s) => s,
            None => self.refresh(None).await?,
        };

        if let Some(key) = snapshot.keys.get(kid) {
            return Ok(Some(key.clone()));
        }

        if snapshot.fetched_at.elapsed() < self.policy.min_refresh_interval {
            return Ok(None);
        }

        debug!(kid = %kid, source = %self.source(), "unknown kid, refetching key set");
        let refreshed = self.refresh(Some(&snapshot)).await?;
        Ok(refreshed.keys.get(kid).cloned())
    }

    async fn fresh_snapshot(&self) -> Option<Snapshot> {
        let current = self.current.read().await;
        current
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.policy.ttl)
            .cloned()
    }

    // `stale`: the snapshot the caller already looked at. If another task has
    // replaced it while we waited for the lock, that newer snapshot is reused.
    async fn refresh(&self, stale: Option<&Snapshot>) -> Result<Snapshot, JwksError> {
        let _guard = self.refresh_lock.lock().await;

        {
            let current = self.current.read().await;
            if let Some(s) = current.as_ref() {
                let replaced = match stale {
                    Some(old) => !Arc::ptr_eq(&old.keys, &s.keys),
                    None => s.fetched_at.elapsed() < self.policy.ttl,
                };
                if replaced {
                    return Ok(s.clone());
                }
            }
        }

        let keys = Arc::new(self.fetch().await?);
        let snapshot = Snapshot {
            keys,
            fetched_at: Instant::now(),
        };
        *self.current.write().await = Some(snapshot.clone());

        Ok(snapshot)
    }

    async fn fetch(&self) -> Result<KeySet, JwksError> {
        let keys = self.fetcher.fetch().await?;
        debug!(source = %self.source(), keys = keys.len(), "fetched signing key set");
        Ok(keys)
    }
}
