//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Cart IDs are stored in the session and mapped to backend carts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::types::{Cart, CartLine, CartLineInput, CartLineUpdateInput};
use crate::filters;
use crate::middleware::Tenant;
use crate::routes::PageShell;
use crate::state::AppState;

/// Session keys owned by the cart flow.
mod session_keys {
    /// Key for storing the backend cart ID.
    pub const CART_ID: &str = "cart_id";
}

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub variant_title: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
        }
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines.iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal.display(),
            item_count: cart.total_quantity,
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            handle: line.handle.to_string(),
            title: line.title.clone(),
            variant_title: line
                .variant_title
                .as_ref()
                .filter(|t| *t != "Default")
                .cloned(),
            quantity: line.quantity,
            price: line.unit_price.display(),
            line_price: line.line_price.display(),
            image_url: line.image.as_ref().map(|img| img.url.clone()),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// Set the cart ID in the session.
async fn set_cart_id(
    session: &Session,
    cart_id: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART_ID, cart_id).await
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub store_name: String,
    pub shell: PageShell,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(state, tenant, session), fields(store = %tenant.key.store_id))]
pub async fn show(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
    session: Session,
) -> impl IntoResponse {
    let cart = match get_cart_id(&session).await {
        Some(cart_id) => match state.backend().get_cart(&cart_id).await {
            Ok(cart) => CartView::from(&cart),
            Err(e) => {
                tracing::warn!("Failed to fetch cart {cart_id}: {e}");
                CartView::empty()
            }
        },
        None => CartView::empty(),
    };

    let binding = tenant.binding(&state);
    let shell = PageShell::resolve(&binding, &tenant).await;

    CartShowTemplate {
        store_name: tenant.store_name.clone(),
        shell,
        cart,
    }
}

/// Add item to cart (HTMX).
///
/// Creates a new cart if one doesn't exist, or adds to existing cart.
/// Returns an HTMX trigger to update the cart count badge.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let line = CartLineInput {
        variant_id: form.variant_id,
        quantity: form.quantity.unwrap_or(1),
    };

    let result = match get_cart_id(&session).await {
        Some(cart_id) => {
            // Add to existing cart
            state.backend().add_to_cart(&cart_id, vec![line]).await
        }
        None => {
            // Create new cart with this item
            state.backend().create_cart(vec![line]).await
        }
    };

    match result {
        Ok(cart) => {
            // Save cart ID to session
            if let Err(e) = set_cart_id(&session, cart.id.as_str()).await {
                tracing::error!("Failed to save cart ID to session: {e}");
            }

            // Return cart count with HTMX trigger to update other elements
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate {
                    count: cart.total_quantity,
                },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to add item to cart: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"cart-error\">Error adding to cart</span>"),
            )
                .into_response()
        }
    }
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let update = CartLineUpdateInput {
        line_id: form.line_id.into(),
        quantity: form.quantity,
    };

    match state.backend().update_cart_line(&cart_id, update).await {
        Ok(cart) => {
            let cart = CartView::from(&cart);
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartItemsTemplate { cart },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update cart: {e}");
            CartItemsTemplate {
                cart: CartView::empty(),
            }
            .into_response()
        }
    }
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    match state.backend().remove_cart_line(&cart_id, &form.line_id).await {
        Ok(cart) => {
            let cart = CartView::from(&cart);
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartItemsTemplate { cart },
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to remove from cart: {e}");
            CartItemsTemplate {
                cart: CartView::empty(),
            }
            .into_response()
        }
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = match get_cart_id(&session).await {
        Some(cart_id) => state
            .backend()
            .get_cart(&cart_id)
            .await
            .map(|cart| cart.total_quantity)
            .unwrap_or(0),
        None => 0,
    };

    CartCountTemplate { count }
}

/// Redirect to the backend-hosted checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        // No cart, redirect to cart page
        return Redirect::to("/cart").into_response();
    };

    match state.backend().get_cart(&cart_id).await {
        Ok(cart) => Redirect::to(&cart.checkout_url).into_response(),
        Err(e) => {
            tracing::error!("Failed to get cart for checkout: {e}");
            Redirect::to("/cart").into_response()
        }
    }
}
