//! Types returned by the commerce backend API.

use serde::{Deserialize, Serialize};
use vitrine_core::{CartId, LineItemId, Price, ProductHandle, StoreId};
use vitrine_theme::StoreContext;

/// A tenant store record, as returned by `GET /stores/by-host/{host}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: StoreId,
    pub name: String,
    pub host: String,
    /// Theme addressing fields for this store.
    #[serde(default)]
    pub theme: StoreContext,
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub handle: ProductHandle,
    pub title: String,
    #[serde(default)]
    pub description_html: String,
    pub price: Price,
    #[serde(default)]
    pub compare_at_price: Option<Price>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    /// Identifier of the default purchasable variant.
    pub variant_id: String,
}

impl Product {
    /// The first image, if any.
    #[must_use]
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }
}

/// A line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: LineItemId,
    pub handle: ProductHandle,
    pub title: String,
    #[serde(default)]
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_price: Price,
    #[serde(default)]
    pub image: Option<Image>,
}

/// A cart, as returned by the cart endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default)]
    pub lines: Vec<CartLine>,
    pub subtotal: Price,
    pub total_quantity: u32,
    /// Backend-hosted checkout URL for this cart.
    pub checkout_url: String,
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineInput {
    pub variant_id: String,
    pub quantity: u32,
}

/// Input for changing a line's quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineUpdateInput {
    pub line_id: LineItemId,
    pub quantity: u32,
}
