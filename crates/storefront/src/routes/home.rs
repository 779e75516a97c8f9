//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Extension, extract::State, response::IntoResponse};
use tracing::instrument;

use crate::backend::types::Product;
use crate::filters;
use crate::middleware::Tenant;
use crate::routes::{PageShell, slot_props};
use crate::state::AppState;

// =============================================================================
// Product and Image Views
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub handle: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub featured_image: Option<ImageView>,
    pub product_type: Option<String>,
}

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let featured_image = product.featured_image().map(|img| ImageView {
            url: img.url.clone(),
            alt: img.alt_text.clone().unwrap_or_default(),
        });

        Self {
            handle: product.handle.to_string(),
            title: product.title.clone(),
            price: product.price.display(),
            compare_at_price: product.compare_at_price.map(|p| p.display()),
            featured_image,
            product_type: product.product_type.clone(),
        }
    }
}

// =============================================================================
// Home Page
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Store display name.
    pub store_name: String,
    /// Themed page chrome.
    pub shell: PageShell,
    /// Hero slot, resolved per store theme.
    pub hero_html: String,
    /// Testimonials slot, deferred behind a placeholder.
    pub testimonials_html: String,
    /// Featured products for the grid.
    pub featured_products: Vec<ProductView>,
}

/// Number of products to show on the home page.
const FEATURED_PRODUCTS: i64 = 8;

/// Display the home page.
#[instrument(skip(state, tenant), fields(store = %tenant.key.store_id))]
pub async fn home(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
) -> impl IntoResponse {
    let binding = tenant.binding(&state);
    let props = slot_props(&tenant);

    let shell = PageShell::resolve(&binding, &tenant).await;
    let hero_html = binding.slot("Hero", &props).await;
    // Below the fold; swapped in once the page is interactive. Crawlers get
    // the static placeholder shape.
    let testimonials_html = binding.placeholder("Testimonials");

    let featured_products = state
        .backend()
        .get_products(Some(FEATURED_PRODUCTS))
        .await
        .map_or_else(
            |e| {
                tracing::error!("Failed to fetch featured products: {e}");
                Vec::new()
            },
            |products| products.iter().map(ProductView::from).collect(),
        );

    HomeTemplate {
        store_name: tenant.store_name.clone(),
        shell,
        hero_html,
        testimonials_html,
        featured_products,
    }
}
