//! Account profile route handler.
//!
//! Customer identity lives behind the backend; the storefront renders the
//! profile page chrome and the themed `profile/ProfileCard` slot.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Extension, extract::State, response::IntoResponse};
use serde_json::Value;
use tracing::instrument;

use crate::filters;
use crate::middleware::Tenant;
use crate::routes::{PageShell, slot_props};
use crate::state::AppState;

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub store_name: String,
    pub shell: PageShell,
    /// `profile/ProfileCard` slot, resolved per store theme.
    pub profile_card_html: String,
}

/// Display the account overview.
#[instrument(skip(state, tenant), fields(store = %tenant.key.store_id))]
pub async fn index(
    State(state): State<AppState>,
    Extension(tenant): Extension<Tenant>,
) -> impl IntoResponse {
    let binding = tenant.binding(&state);
    let shell = PageShell::resolve(&binding, &tenant).await;

    let mut props = slot_props(&tenant);
    props.insert(
        "customer_name".to_string(),
        Value::String("Guest".to_string()),
    );
    let profile_card_html = binding.slot("profile/ProfileCard", &props).await;

    AccountTemplate {
        store_name: tenant.store_name.clone(),
        shell,
        profile_card_html,
    }
}
