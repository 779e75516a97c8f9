//! Product listing and detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::Value;
use tracing::instrument;

use crate::backend::BackendError;
use crate::backend::types::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::Tenant;
use crate::routes::{PageShell, home::ProductView, slot_props};
use crate::state::AppState;

/// Product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub handle: String,
    pub title: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub variant_id: String,
    pub images: Vec<super::home::ImageView>,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            handle: product.handle.to_string(),
            title: product.title.clone(),
            price: product.price.display(),
            compare_at_price: product.compare_at_price.map(|p| p.display()),
            variant_id: product.variant_id.clone(),
            images: product
                .images
                .iter()
                .map(|img| super::home::ImageView {
                    url: img.url.clone(),
                    alt: img.alt_text.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub store_name: String,
    pub shell: PageShell,
    pub products: Vec<ProductView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub store_name: String,
    pub shell: PageShell,
    pub product: ProductDetailView,
    /// `ProductDesc` slot rendered with this product's props.
    pub product_desc_html: String,
}

/// Display the product listing.
#[instrument(skip(state, tenant), fields(store = %tenant.key.store_id))]
pub async fn index(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
) -> impl IntoResponse {
    let binding = tenant.binding(&state);
    let shell = PageShell::resolve(&binding, &tenant).await;

    let products = state.backend().get_products(None).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch products: {e}");
            Vec::new()
        },
        |products| products.iter().map(ProductView::from).collect(),
    );

    ProductsIndexTemplate {
        store_name: tenant.store_name.clone(),
        shell,
        products,
    }
}

/// Display a product detail page.
#[instrument(skip(state, tenant), fields(store = %tenant.key.store_id))]
pub async fn show(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
    Path(handle): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = match state.backend().get_product(&handle).await {
        Ok(product) => product,
        Err(BackendError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("product {handle}")));
        }
        Err(e) => return Err(e.into()),
    };

    let binding = tenant.binding(&state);
    let shell = PageShell::resolve(&binding, &tenant).await;

    // The description slot gets the product's data on top of the store props.
    let mut props = slot_props(&tenant);
    props.insert("title".to_string(), Value::String(product.title.clone()));
    props.insert(
        "description".to_string(),
        Value::String(product.description_html.clone()),
    );
    let product_desc_html = binding.slot("ProductDesc", &props).await;

    Ok(ProductShowTemplate {
        store_name: tenant.store_name.clone(),
        shell,
        product: ProductDetailView::from(&product),
        product_desc_html,
    })
}
