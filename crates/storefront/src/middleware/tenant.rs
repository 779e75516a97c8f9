//! Tenant resolution middleware.
//!
//! Every request is served for exactly one store, selected by the request's
//! `Host` header. The middleware looks the store up through the backend
//! (cached), derives the theme addressing key, classifies the rendering
//! context from the `User-Agent`, and inserts a [`Tenant`] into request
//! extensions for handlers to consume.
//!
//! An unknown or missing host is not an error: the request proceeds with
//! the all-defaults addressing key, so the page renders with the default
//! theme instead of failing.

use axum::{
    extract::{Request, State},
    http::header::{HOST, USER_AGENT},
    middleware::Next,
    response::Response,
};
use vitrine_theme::{RenderMode, ThemeBinding, ThemeKey};

use crate::state::{AppState, COMMON_SLOTS};

/// The resolved tenant for the current request.
#[derive(Clone)]
pub struct Tenant {
    /// Store display name; the sentinel store renders as "Vitrine".
    pub store_name: String,
    pub key: ThemeKey,
    pub mode: RenderMode,
}

impl Tenant {
    /// Build the per-request theme binding.
    #[must_use]
    pub fn binding(&self, state: &AppState) -> ThemeBinding {
        ThemeBinding::new(state.theme().clone(), self.key.clone(), self.mode)
    }
}

/// Resolve the tenant for this request and stash it in extensions.
pub async fn tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h).to_string());

    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok());
    let mode = RenderMode::from_user_agent(user_agent);

    let (store_name, context) = match &host {
        Some(host) => match state.backend().store_by_host(host).await {
            Ok(store) => (store.name.clone(), Some(store.theme)),
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "store lookup failed, using default theme");
                (default_store_name(), None)
            }
        },
        None => (default_store_name(), None),
    };

    let key = ThemeKey::from_context(context.as_ref());

    // Speculatively warm the common slots the first time a store is seen.
    // Best-effort: the preloader swallows its own failures.
    let first_slot = COMMON_SLOTS.first().copied();
    if first_slot.is_some_and(|slot| !state.theme().is_cached(&key, slot)) {
        let engine = state.theme().clone();
        let preload_key = key.clone();
        tokio::spawn(async move {
            engine.preload(&preload_key, COMMON_SLOTS).await;
        });
    }

    request.extensions_mut().insert(Tenant {
        store_name,
        key,
        mode,
    });

    next.run(request).await
}

fn default_store_name() -> String {
    "Vitrine".to_string()
}
