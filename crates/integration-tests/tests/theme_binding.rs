//! Integration tests for the per-request theme binding.
//!
//! Covers the consumer-facing surface: render-mode classification,
//! placeholder markup rules, and the render-error boundary.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::{Value, json};
use vitrine_theme::{
    ComponentSource, Props, RenderMode, StaticComponentSource, ThemeBinding, ThemeEngine, ThemeKey,
};

fn make_binding(source: StaticComponentSource, mode: RenderMode) -> ThemeBinding {
    let engine = ThemeEngine::new(Arc::new(source) as Arc<dyn ComponentSource>);
    let key = ThemeKey {
        store_id: "acme".to_string(),
        theme_id: "theme3".to_string(),
        ..ThemeKey::default()
    };
    ThemeBinding::new(engine, key, mode)
}

fn store_props(name: &str) -> Props {
    let mut props = Props::new();
    props.insert("store_name".to_string(), Value::String(name.to_string()));
    props
}

// =============================================================================
// Slot Rendering
// =============================================================================

#[tokio::test]
async fn test_slot_renders_with_props() {
    let source = StaticComponentSource::new().with_fragment(
        "acme/theme3/components/Navbar",
        "<nav><a href=\"/\">{{store_name}}</a></nav>",
    );
    let binding = make_binding(source, RenderMode::Interactive);

    let html = binding.slot("Navbar", &store_props("Acme Goods")).await;
    assert_eq!(html, "<nav><a href=\"/\">Acme Goods</a></nav>");
}

#[tokio::test]
async fn test_fallback_slot_renders_transparently() {
    // The consumer cannot tell fallback content from primary content; only
    // logs and the handle record the difference.
    let source = StaticComponentSource::new().with_fragment(
        "default/Grocery/theme1/components/Navbar",
        "<nav>{{store_name}}</nav>",
    );
    let binding = make_binding(source, RenderMode::Interactive);

    let html = binding.slot("Navbar", &store_props("Acme Goods")).await;
    assert_eq!(html, "<nav>Acme Goods</nav>");
}

#[tokio::test]
async fn test_unresolvable_slot_is_silent() {
    let binding = make_binding(StaticComponentSource::new(), RenderMode::Interactive);
    assert_eq!(binding.slot("Nowhere", &Props::new()).await, "");
}

// =============================================================================
// Error Boundary
// =============================================================================

#[tokio::test]
async fn test_render_error_is_scoped_to_the_slot() {
    let source = StaticComponentSource::new()
        .with_fragment("acme/theme3/components/Hero", "<h1>{{headline}}</h1>")
        .with_fragment("acme/theme3/components/Footer", "<footer>fine</footer>");
    let binding = make_binding(source, RenderMode::Interactive);

    // Hero references a prop the page does not supply: inert card.
    let hero = binding.slot("Hero", &Props::new()).await;
    assert_eq!(hero, "<div class=\"slot-error\">Error loading Hero</div>");

    // The rest of the page is unaffected.
    let footer = binding.slot("Footer", &Props::new()).await;
    assert_eq!(footer, "<footer>fine</footer>");
}

#[tokio::test]
async fn test_props_are_escaped() {
    let source = StaticComponentSource::new()
        .with_fragment("acme/theme3/components/Navbar", "<nav>{{store_name}}</nav>");
    let binding = make_binding(source, RenderMode::Interactive);

    let mut props = Props::new();
    props.insert("store_name".to_string(), json!("<img onerror=x>"));
    let html = binding.slot("Navbar", &props).await;
    assert!(!html.contains("<img"));
}

// =============================================================================
// Placeholders & Render Modes
// =============================================================================

#[tokio::test]
async fn test_interactive_placeholder_animates() {
    let binding = make_binding(StaticComponentSource::new(), RenderMode::Interactive);
    let html = binding.placeholder("Testimonials");
    assert!(html.contains("slot-placeholder--pulse"));
    assert!(html.contains("hx-get=\"/fragments/slot/Testimonials\""));
}

#[tokio::test]
async fn test_crawler_never_sees_animated_loading_ui() {
    let binding = make_binding(StaticComponentSource::new(), RenderMode::Crawler);
    let html = binding.placeholder("Testimonials");
    assert!(html.contains("slot-placeholder"));
    assert!(!html.contains("pulse"));
}

#[tokio::test]
async fn test_render_mode_from_user_agent() {
    assert_eq!(
        RenderMode::from_user_agent(Some(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1.15"
        )),
        RenderMode::Interactive
    );
    assert_eq!(
        RenderMode::from_user_agent(Some("Googlebot/2.1")),
        RenderMode::Crawler
    );
    assert_eq!(RenderMode::from_user_agent(None), RenderMode::Crawler);
}
