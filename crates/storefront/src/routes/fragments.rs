//! Deferred theme slot endpoint (HTMX).
//!
//! Pages defer below-the-fold slots behind placeholders
//! (see `ThemeBinding::placeholder`); the placeholder swaps itself for the
//! markup this endpoint returns. The slot name is free-form, so the same
//! route serves every slot.

use axum::{
    Extension,
    extract::{Path, State},
    response::Html,
};
use tracing::instrument;

use crate::middleware::Tenant;
use crate::routes::slot_props;
use crate::state::AppState;

/// Resolve and render a single slot.
///
/// Always returns 200: a slot that resolves nowhere is empty markup, not an
/// error, exactly as it would be when rendered inline.
#[instrument(skip(state, tenant), fields(store = %tenant.key.store_id, slot = %name))]
pub async fn slot(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
    Path(name): Path<String>,
) -> Html<String> {
    let binding = tenant.binding(&state);
    let props = slot_props(&tenant);
    Html(binding.slot(&name, &props).await)
}
