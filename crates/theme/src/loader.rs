//! Primary-then-fallback fragment loading.
//!
//! The loader is stateless per call: it attempts the primary candidate,
//! then the fallback, and reports the outcome as a [`SlotHandle`]. It never
//! errors across its boundary - a slot that resolves nowhere renders
//! nothing. Memoization of outcomes belongs to
//! [`crate::cache::ResolutionCache`].

use std::sync::Arc;
use std::time::Duration;

use crate::fragment::Fragment;
use crate::path::{CandidatePaths, FragmentPath};
use crate::source::{ComponentSource, LoadError};

/// Default bound on a single candidate load.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// The render-stable outcome of resolving one slot.
///
/// Handles are cheap to clone; the fragment is shared behind an `Arc`, so
/// every consumer of the same cache entry sees the identical allocation.
#[derive(Debug, Clone)]
pub enum SlotHandle {
    /// The primary (store-specific) fragment loaded.
    Resolved(Arc<Fragment>),
    /// The primary was absent or failed; the category default loaded.
    Fallback(Arc<Fragment>),
    /// Both candidates failed; the slot renders nothing.
    Empty,
}

impl SlotHandle {
    /// The loaded fragment, if any.
    #[must_use]
    pub const fn fragment(&self) -> Option<&Arc<Fragment>> {
        match self {
            Self::Resolved(fragment) | Self::Fallback(fragment) => Some(fragment),
            Self::Empty => None,
        }
    }

    /// Whether the slot resolved to nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether resolution went through the category-default fallback.
    #[must_use]
    pub const fn via_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Loads fragments from a [`ComponentSource`] with strict
/// primary-before-fallback ordering and a bounded per-candidate timeout.
#[derive(Clone)]
pub struct ComponentLoader {
    source: Arc<dyn ComponentSource>,
    timeout: Duration,
}

impl ComponentLoader {
    /// Create a loader with the default load timeout.
    #[must_use]
    pub fn new(source: Arc<dyn ComponentSource>) -> Self {
        Self::with_timeout(source, DEFAULT_LOAD_TIMEOUT)
    }

    /// Create a loader with an explicit per-candidate timeout.
    #[must_use]
    pub fn with_timeout(source: Arc<dyn ComponentSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Resolve a slot against its two candidates.
    ///
    /// The fallback is only attempted after the primary has failed - never
    /// concurrently with it.
    pub async fn load(&self, paths: &CandidatePaths) -> SlotHandle {
        match self.try_candidate(&paths.primary).await {
            Ok(fragment) => SlotHandle::Resolved(Arc::new(fragment)),
            Err(primary_err) => {
                tracing::debug!(
                    primary = %paths.primary,
                    error = %primary_err,
                    "primary fragment unavailable, trying category default"
                );

                match self.try_candidate(&paths.fallback).await {
                    Ok(fragment) => SlotHandle::Fallback(Arc::new(fragment)),
                    Err(fallback_err) => {
                        tracing::warn!(
                            primary = %paths.primary,
                            fallback = %paths.fallback,
                            error = %fallback_err,
                            "no fragment resolved for slot, rendering nothing"
                        );
                        SlotHandle::Empty
                    }
                }
            }
        }
    }

    async fn try_candidate(&self, path: &FragmentPath) -> Result<Fragment, LoadError> {
        match tokio::time::timeout(self.timeout, self.source.load(path)).await {
            Ok(result) => result,
            Err(_) => Err(LoadError::Timeout {
                path: path.as_str().to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::key::ThemeKey;
    use crate::source::StaticComponentSource;

    fn tenant_key(store: &str, theme: &str) -> ThemeKey {
        ThemeKey {
            store_id: store.to_string(),
            theme_id: theme.to_string(),
            ..ThemeKey::default()
        }
    }

    #[tokio::test]
    async fn test_primary_hit_skips_fallback() {
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("acme/theme3/components/Navbar", "<nav>acme</nav>")
                .with_fragment("default/Grocery/theme1/components/Navbar", "<nav>default</nav>"),
        );
        let loader = ComponentLoader::new(Arc::clone(&source) as Arc<dyn ComponentSource>);
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme3"), "Navbar");

        let handle = loader.load(&paths).await;
        assert!(!handle.via_fallback());
        assert_eq!(source.call_log(), ["acme/theme3/components/Navbar"]);
    }

    #[tokio::test]
    async fn test_primary_miss_falls_back_in_order() {
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("default/Grocery/theme1/components/Navbar", "<nav>default</nav>"),
        );
        let loader = ComponentLoader::new(Arc::clone(&source) as Arc<dyn ComponentSource>);
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme3"), "Navbar");

        let handle = loader.load(&paths).await;
        assert!(handle.via_fallback());
        assert_eq!(
            source.call_log(),
            [
                "acme/theme3/components/Navbar",
                "default/Grocery/theme1/components/Navbar"
            ]
        );
    }

    #[tokio::test]
    async fn test_both_missing_yields_empty_without_error() {
        let source = Arc::new(StaticComponentSource::new());
        let loader = ComponentLoader::new(source as Arc<dyn ComponentSource>);
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme3"), "Navbar");

        let handle = loader.load(&paths).await;
        assert!(handle.is_empty());
        assert!(handle.fragment().is_none());
    }

    #[tokio::test]
    async fn test_unparseable_primary_falls_back() {
        // An import-time throw on the primary path is recovered the same
        // way as a missing file.
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("acme/theme3/components/Hero", "<h1>{{broken</h1>")
                .with_fragment("default/Grocery/theme1/components/Hero", "<h1>ok</h1>"),
        );
        let loader = ComponentLoader::new(source as Arc<dyn ComponentSource>);
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme3"), "Hero");

        let handle = loader.load(&paths).await;
        assert!(handle.via_fallback());
    }

    #[tokio::test]
    async fn test_slow_candidate_times_out_and_falls_back() {
        let source = Arc::new(
            StaticComponentSource::new()
                .with_fragment("acme/theme3/components/Footer", "<footer>slow</footer>")
                .with_fragment("default/Grocery/theme1/components/Footer", "<footer>f</footer>")
                .with_delay(Duration::from_millis(200)),
        );
        let loader = ComponentLoader::with_timeout(
            source as Arc<dyn ComponentSource>,
            Duration::from_millis(20),
        );
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme3"), "Footer");

        // Both candidates exceed the bound: primary times out, fallback
        // times out, the slot is empty.
        let handle = loader.load(&paths).await;
        assert!(handle.is_empty());
    }
}
