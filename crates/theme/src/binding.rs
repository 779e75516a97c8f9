//! Per-request consumer API for theme slots.
//!
//! A `ThemeBinding` is built once per request from the shared engine, the
//! request's tenant context, and its render mode. It is the only place
//! where slot resolution meets page rendering, and it owns the
//! render-error boundary: a fragment that loaded but fails to render with
//! the page's props produces an inert error card scoped to that slot,
//! never a broken page.
//!
//! # Render modes
//!
//! Deferred slots are swapped in client-side (HTMX `hx-get` against the
//! slot fragment route). Until the swap, the page shows a placeholder.
//! Crawlers must only ever observe final content or a static placeholder
//! shape - never an animated loading state - so the animated skeleton class
//! is applied in interactive mode only.

use crate::engine::ThemeEngine;
use crate::fragment::Props;
use crate::key::ThemeKey;
use crate::loader::SlotHandle;
use crate::path::normalize_slot_name;

/// User-agent markers that identify non-interactive rendering contexts.
const CRAWLER_MARKERS: &[&str] = &[
    "bot",
    "crawl",
    "spider",
    "slurp",
    "bingpreview",
    "facebookexternalhit",
    "headlesschrome",
    "lighthouse",
];

/// The rendering context of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// A person in a browser; animated loading indicators are fine.
    #[default]
    Interactive,
    /// A crawler or prerenderer; only static placeholder shapes.
    Crawler,
}

impl RenderMode {
    /// Classify a request by its `User-Agent` header.
    #[must_use]
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent else {
            // No user agent at all is automation, not a browser.
            return Self::Crawler;
        };
        let ua = ua.to_ascii_lowercase();
        if CRAWLER_MARKERS.iter().any(|marker| ua.contains(marker)) {
            Self::Crawler
        } else {
            Self::Interactive
        }
    }
}

/// Request-scoped access point for resolved theme slots.
#[derive(Clone)]
pub struct ThemeBinding {
    engine: ThemeEngine,
    key: ThemeKey,
    mode: RenderMode,
}

impl ThemeBinding {
    #[must_use]
    pub const fn new(engine: ThemeEngine, key: ThemeKey, mode: RenderMode) -> Self {
        Self { engine, key, mode }
    }

    /// The addressing key this binding resolves against.
    #[must_use]
    pub const fn key(&self) -> &ThemeKey {
        &self.key
    }

    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Resolve and render a slot with the given props.
    ///
    /// Returns final markup in every case:
    /// - resolved fragment rendered with `props`
    /// - empty string when the slot resolves nowhere (routine)
    /// - an inert error card when the fragment fails to render (a real
    ///   bug, logged at error level)
    pub async fn slot(&self, name: &str, props: &Props) -> String {
        match self.engine.resolve(&self.key, name).await {
            SlotHandle::Empty => String::new(),
            handle => {
                // Guarded: non-empty handles always carry a fragment.
                let Some(fragment) = handle.fragment() else {
                    return String::new();
                };
                match fragment.render(props) {
                    Ok(html) => html,
                    Err(e) => {
                        tracing::error!(
                            slot = name,
                            store_id = %self.key.store_id,
                            error = %e,
                            "slot fragment failed to render"
                        );
                        error_card(name)
                    }
                }
            }
        }
    }

    /// Markup for a deferred slot: a placeholder that HTMX swaps for the
    /// resolved content once the page is interactive.
    #[must_use]
    pub fn placeholder(&self, name: &str) -> String {
        let slot = normalize_slot_name(name);
        let animation = match self.mode {
            RenderMode::Interactive => " slot-placeholder--pulse",
            RenderMode::Crawler => "",
        };
        format!(
            "<div class=\"slot-placeholder{animation}\" data-slot=\"{slot}\" \
             hx-get=\"/fragments/slot/{slot}\" hx-trigger=\"load\" hx-swap=\"outerHTML\"></div>"
        )
    }
}

/// Inert, slot-scoped error card.
fn error_card(name: &str) -> String {
    let display_name = normalize_slot_name(name)
        .rsplit('/')
        .next()
        .unwrap_or(name);
    format!("<div class=\"slot-error\">Error loading {display_name}</div>")
}
