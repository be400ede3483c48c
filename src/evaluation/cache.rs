use super::{limits::OutputLimits, request::EvaluationRequest};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// The default time to live of cached responses.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// A key-value store with expiring entries.
///
/// Implementations must be usable from several threads; failures are reported as errors,
/// which the evaluator logs and ignores.
pub trait Cache: Send + Sync {
    /// Returns the value of a key, if present and not expired.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Sets the value of a key for the given duration.
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// An in-process [`Cache`].
///
/// # Example
///
/// ```
/// # use crustaspic::evaluation::{Cache, MemoryCache};
/// # use std::time::Duration;
/// let cache = MemoryCache::default();
/// cache.set("k", "v", Duration::from_secs(60)).unwrap();
/// assert_eq!(Some("v".to_string()), cache.get("k").unwrap());
/// assert_eq!(None, cache.get("other").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl MemoryCache {
    /// Returns the number of entries.
    ///
    /// Expired entries are dropped by each write, so the ones that expired since the last write are counted.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns `true` iff the cache has no entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("the cache lock is poisoned"))?;
        match entries.get(key) {
            Some((expiration, value)) if *expiration > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let expiration = now
            .checked_add(ttl)
            .ok_or_else(|| anyhow!("invalid time to live {:?}", ttl))?;
        let mut entries = self.entries.lock().map_err(|_| anyhow!("the cache lock is poisoned"))?;
        entries.retain(|_, (e, _)| *e > now);
        entries.insert(key.to_string(), (expiration, value.to_string()));
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintInput<'a> {
    request: &'a EvaluationRequest,
    limits: &'a OutputLimits,
}

/// Computes the cache key of a request evaluated under the given output limits.
///
/// Two requests differing only by their `bypassCache` flag share their key.
pub fn fingerprint(request: &EvaluationRequest, limits: &OutputLimits) -> Result<String> {
    let mut normalized = request.clone();
    normalized.bypass_cache = false;
    let json = serde_json::to_string(&FingerprintInput {
        request: &normalized,
        limits,
    })
    .context("while computing the fingerprint of a request")?;
    let mut hasher = DefaultHasher::new();
    json.hash(&mut hasher);
    Ok(format!("aspic:eval:{:016x}", hasher.finish()))
}
