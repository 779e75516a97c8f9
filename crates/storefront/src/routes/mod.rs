//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/:handle       - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Redirect to backend-hosted checkout
//!
//! # Account
//! GET  /account                - Profile page
//!
//! # Content
//! GET  /pages/:slug            - Markdown content page
//!
//! # Theme fragments
//! GET  /fragments/slot/*name   - Deferred slot resolution (HTMX)
//! ```

pub mod account;
pub mod cart;
pub mod fragments;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use vitrine_theme::{Props, ThemeBinding};

use crate::middleware::Tenant;
use crate::state::AppState;

/// Props shared by every slot render: whatever a fragment needs about the
/// store itself.
pub(crate) fn slot_props(tenant: &Tenant) -> Props {
    let mut props = Props::new();
    props.insert(
        "store_name".to_string(),
        serde_json::Value::String(tenant.store_name.clone()),
    );
    props
}

/// The themed chrome around every page.
pub struct PageShell {
    pub navbar_html: String,
    pub footer_html: String,
}

impl PageShell {
    /// Resolve the Navbar and Footer slots for this request.
    pub(crate) async fn resolve(binding: &ThemeBinding, tenant: &Tenant) -> Self {
        let props = slot_props(tenant);
        Self {
            navbar_html: binding.slot("Navbar", &props).await,
            footer_html: binding.slot("Footer", &props).await,
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the theme fragment routes router.
pub fn fragment_routes() -> Router<AppState> {
    Router::new().route("/slot/{*name}", get(fragments::slot))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout redirect
        .route("/checkout", get(cart::checkout))
        // Account
        .route("/account", get(account::index))
        // Content pages
        .route("/pages/{slug}", get(pages::show))
        // Deferred theme slots
        .nest("/fragments", fragment_routes())
}
