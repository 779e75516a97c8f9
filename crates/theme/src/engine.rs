//! The assembled resolution pipeline.
//!
//! `ThemeEngine` owns the loader and the resolution cache and is shared
//! across the whole process (cheaply cloneable via `Arc`). Request handlers
//! do not use it directly - they go through
//! [`crate::binding::ThemeBinding`], which carries the request's addressing
//! key and render mode.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, ResolutionCache};
use crate::key::ThemeKey;
use crate::loader::{ComponentLoader, SlotHandle};
use crate::path::CandidatePaths;
use crate::source::ComponentSource;

/// Shared theme-resolution engine.
#[derive(Clone)]
pub struct ThemeEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    loader: ComponentLoader,
    cache: ResolutionCache,
}

impl ThemeEngine {
    /// Create an engine over `source` with the default load timeout and a
    /// fresh cache.
    #[must_use]
    pub fn new(source: Arc<dyn ComponentSource>) -> Self {
        Self::with_parts(ComponentLoader::new(source), ResolutionCache::new())
    }

    /// Create an engine with an explicit load timeout.
    #[must_use]
    pub fn with_timeout(source: Arc<dyn ComponentSource>, timeout: Duration) -> Self {
        Self::with_parts(
            ComponentLoader::with_timeout(source, timeout),
            ResolutionCache::new(),
        )
    }

    /// Create an engine from pre-built parts. Lets tests inject a cache
    /// they can inspect.
    #[must_use]
    pub fn with_parts(loader: ComponentLoader, cache: ResolutionCache) -> Self {
        Self {
            inner: Arc::new(EngineInner { loader, cache }),
        }
    }

    /// Resolve a slot under an addressing key.
    ///
    /// The first resolution of a (store, theme, slot) triple runs the
    /// primary-then-fallback load; every later one - and every concurrent
    /// one - returns the stored handle.
    pub async fn resolve(&self, key: &ThemeKey, slot: &str) -> SlotHandle {
        let cache_key = CacheKey::new(key, slot);
        let paths = CandidatePaths::resolve(key, slot);
        let loader = self.inner.loader.clone();

        self.inner
            .cache
            .get_or_resolve(cache_key, async move { loader.load(&paths).await })
            .await
    }

    /// Whether a slot already has a stored outcome.
    #[must_use]
    pub fn is_cached(&self, key: &ThemeKey, slot: &str) -> bool {
        self.inner.cache.contains(&CacheKey::new(key, slot))
    }

    /// Speculatively resolve a batch of slots ahead of navigation,
    /// populating the cache.
    ///
    /// Best-effort by contract: already-cached slots are skipped, slots
    /// that resolve nowhere are logged and otherwise ignored, and nothing
    /// is returned to the caller. Typically spawned as a background task
    /// right after the tenant context is known.
    pub async fn preload<S: AsRef<str>>(&self, key: &ThemeKey, slots: &[S]) {
        for slot in slots {
            let slot = slot.as_ref();
            if self.is_cached(key, slot) {
                continue;
            }

            let handle = self.resolve(key, slot).await;
            if handle.is_empty() {
                tracing::debug!(
                    store_id = %key.store_id,
                    slot,
                    "preload resolved nothing for slot"
                );
            }
        }
    }

    /// Diagnostic: number of cached outcomes.
    pub async fn cached_slots(&self) -> u64 {
        self.inner.cache.entry_count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::StaticComponentSource;

    fn tenant_key(store: &str, theme: &str) -> ThemeKey {
        ThemeKey {
            store_id: store.to_string(),
            theme_id: theme.to_string(),
            ..ThemeKey::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_caches_single_load() {
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("acme/theme3/components/Navbar", "<nav></nav>"),
        );
        let engine = ThemeEngine::new(Arc::clone(&source) as Arc<dyn ComponentSource>);
        let key = tenant_key("acme", "theme3");

        // Two call sites, one underlying load.
        let first = engine.resolve(&key, "Navbar").await;
        let second = engine.resolve(&key, "Navbar").await;

        assert_eq!(source.load_count("acme/theme3/components/Navbar"), 1);
        let (SlotHandle::Resolved(a), SlotHandle::Resolved(b)) = (&first, &second) else {
            panic!("expected resolved handles");
        };
        assert!(Arc::ptr_eq(a, b));
    }

    #[tokio::test]
    async fn test_empty_outcome_is_cached_too() {
        let source = Arc::new(StaticComponentSource::new());
        let engine = ThemeEngine::new(Arc::clone(&source) as Arc<dyn ComponentSource>);
        let key = tenant_key("acme", "theme3");

        assert!(engine.resolve(&key, "Navbar").await.is_empty());
        assert!(engine.resolve(&key, "Navbar").await.is_empty());

        // Primary and fallback attempted once each, then memoized.
        assert_eq!(source.call_log().len(), 2);
    }

    #[tokio::test]
    async fn test_preload_populates_cache_and_swallows_misses() {
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("acme/theme3/components/Navbar", "<nav></nav>"),
        );
        let engine = ThemeEngine::new(Arc::clone(&source) as Arc<dyn ComponentSource>);
        let key = tenant_key("acme", "theme3");

        engine.preload(&key, &["Navbar", "Hero", "Footer"]).await;

        assert!(engine.is_cached(&key, "Navbar"));
        assert!(engine.is_cached(&key, "Hero"));
        assert!(engine.is_cached(&key, "Footer"));
        assert_eq!(engine.cached_slots().await, 3);

        // A later render of a preloaded slot does not reload.
        let _ = engine.resolve(&key, "Navbar").await;
        assert_eq!(source.load_count("acme/theme3/components/Navbar"), 1);
    }

    #[tokio::test]
    async fn test_preload_skips_already_cached() {
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("acme/theme3/components/Navbar", "<nav></nav>"),
        );
        let engine = ThemeEngine::new(Arc::clone(&source) as Arc<dyn ComponentSource>);
        let key = tenant_key("acme", "theme3");

        let _ = engine.resolve(&key, "Navbar").await;
        engine.preload(&key, &["Navbar"]).await;

        assert_eq!(source.load_count("acme/theme3/components/Navbar"), 1);
    }

    #[tokio::test]
    async fn test_theme_switch_resolves_fresh() {
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("acme/theme1/components/Navbar", "<nav>one</nav>")
                .with_fragment("acme/theme2/components/Navbar", "<nav>two</nav>"),
        );
        let engine = ThemeEngine::new(Arc::clone(&source) as Arc<dyn ComponentSource>);

        let _ = engine.resolve(&tenant_key("acme", "theme1"), "Navbar").await;
        let _ = engine.resolve(&tenant_key("acme", "theme2"), "Navbar").await;

        assert_eq!(source.load_count("acme/theme1/components/Navbar"), 1);
        assert_eq!(source.load_count("acme/theme2/components/Navbar"), 1);
        assert_eq!(engine.cached_slots().await, 2);
    }
}
