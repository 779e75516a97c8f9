//! Process-wide memoization of resolution outcomes.
//!
//! Keys are the mode-normalized (store, theme, slot) triple, so two
//! addressing keys that normalize to the same triple intentionally share
//! one entry. Entries live for the life of the process: no TTL, no size
//! bound. The key space is bounded by active stores x themes x slot names
//! rather than request volume, which keeps growth tame for ordinary
//! deployments; very high tenant cardinality would need an eviction story,
//! and that is a known scaling limit rather than something this cache
//! silently papers over.
//!
//! Concurrent misses for one key are deduplicated: the underlying cache
//! coalesces initializers, so exactly one resolution runs and every waiter
//! shares its result.

use moka::future::Cache;

use crate::key::ThemeKey;
use crate::loader::SlotHandle;
use crate::path::normalize_slot_name;

/// Composite cache key: `{effective store}/{effective theme}/{normalized slot}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the cache key for a slot under an addressing key.
    #[must_use]
    pub fn new(key: &ThemeKey, slot: &str) -> Self {
        let effective = key.effective();
        Self(format!(
            "{}/{}/{}",
            effective.store_id,
            effective.theme_id,
            normalize_slot_name(slot)
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The resolution cache. An explicit object rather than module state so
/// tests construct a fresh one per case and the engine takes an injected
/// instance.
#[derive(Debug, Clone)]
pub struct ResolutionCache {
    inner: Cache<CacheKey, SlotHandle>,
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionCache {
    /// Create an empty cache. Unbounded, no expiry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Return the stored handle for `key`, or run `resolve` to produce,
    /// store, and return it. Concurrent callers with the same uncached key
    /// share a single `resolve` invocation.
    pub async fn get_or_resolve<F>(&self, key: CacheKey, resolve: F) -> SlotHandle
    where
        F: Future<Output = SlotHandle>,
    {
        self.inner.get_with(key, resolve).await
    }

    /// Whether `key` already has a stored outcome.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of stored outcomes. Flushes pending internal maintenance
    /// first so the count is exact; intended for tests and diagnostics.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}
