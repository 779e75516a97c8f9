//! Application state shared across handlers.

use std::sync::Arc;

use vitrine_theme::{FsComponentSource, ThemeEngine};

use crate::backend::BackendClient;
use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};

/// Logical slots every page composes; preloaded speculatively the first
/// time a store is seen.
pub const COMMON_SLOTS: &[&str] = &["Navbar", "Hero", "Footer", "Testimonials"];

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the backend client and the theme engine.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    theme: ThemeEngine,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, ContentError> {
        let backend = BackendClient::new(&config.backend);
        let source = Arc::new(FsComponentSource::new(&config.themes_dir));
        let theme = ThemeEngine::with_timeout(source, config.slot_load_timeout);
        let content = ContentStore::load(&config.content_dir)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                theme,
                content,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the theme-resolution engine.
    #[must_use]
    pub fn theme(&self) -> &ThemeEngine {
        &self.inner.theme
    }

    /// Get a reference to the markdown content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
