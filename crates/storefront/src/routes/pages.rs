//! Markdown content page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension,
    extract::{Path, State},
};
use tracing::instrument;

use crate::content::Page;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::Tenant;
use crate::routes::PageShell;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/show.html")]
pub struct PageTemplate {
    pub store_name: String,
    pub shell: PageShell,
    pub page: Page,
}

/// Display a markdown content page.
#[instrument(skip(state, tenant), fields(store = %tenant.key.store_id))]
pub async fn show(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
    Path(slug): Path<String>,
) -> Result<PageTemplate> {
    let page = state
        .content()
        .get_page(&slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?
        .clone();

    let binding = tenant.binding(&state);
    let shell = PageShell::resolve(&binding, &tenant).await;

    Ok(PageTemplate {
        store_name: tenant.store_name.clone(),
        shell,
        page,
    })
}
