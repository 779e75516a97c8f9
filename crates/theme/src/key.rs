//! Theme addressing keys derived from tenant context.
//!
//! The tenant collaborator hands the storefront a [`StoreContext`] - a raw
//! record that may be partially or entirely absent while the store record is
//! still loading. [`ThemeKey::from_context`] turns that into a well-formed
//! addressing key by substituting defaults for every missing field, so the
//! rest of the pipeline never deals with optionality.

use serde::{Deserialize, Deserializer, Serialize};
use vitrine_core::ServiceCategory;

/// Sentinel store identifier used when the tenant is unknown and for the
/// shared default theme tree.
pub const DEFAULT_STORE_ID: &str = "default";

/// Theme identifier used when the store record carries none.
pub const DEFAULT_THEME_ID: &str = "default";

/// Sub-variant used when falling back to a business-category default.
pub const DEFAULT_SELECTED_THEME: &str = "theme1";

/// Raw tenant/store state as delivered by the backend.
///
/// Everything is optional: the record may not have loaded yet, and older
/// store records omit fields that were added later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreContext {
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub theme_id: Option<String>,
    /// The backend serializes this flag as `0`/`1`; plain booleans are
    /// accepted too.
    #[serde(default, deserialize_with = "bool_from_int_or_bool")]
    pub use_default_theme: bool,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub selected_theme: Option<String>,
}

/// The well-formed, three-part addressing key for theme resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThemeKey {
    pub store_id: String,
    pub theme_id: String,
    /// When set, resolution addresses the business-category default tree
    /// instead of the store-specific one. Fixed for the whole resolution.
    pub use_default_theme: bool,
    pub service_name: ServiceCategory,
    pub selected_theme: String,
}

impl Default for ThemeKey {
    fn default() -> Self {
        Self {
            store_id: DEFAULT_STORE_ID.to_string(),
            theme_id: DEFAULT_THEME_ID.to_string(),
            use_default_theme: false,
            service_name: ServiceCategory::default(),
            selected_theme: DEFAULT_SELECTED_THEME.to_string(),
        }
    }
}

impl ThemeKey {
    /// Derive an addressing key from raw tenant context.
    ///
    /// Tolerates an absent context (store record not yet loaded) by
    /// returning the all-defaults key. Unrecognized service names normalize
    /// to the default category.
    #[must_use]
    pub fn from_context(context: Option<&StoreContext>) -> Self {
        let Some(ctx) = context else {
            return Self::default();
        };

        Self {
            store_id: non_empty(ctx.store_id.as_deref(), DEFAULT_STORE_ID),
            theme_id: non_empty(ctx.theme_id.as_deref(), DEFAULT_THEME_ID),
            use_default_theme: ctx.use_default_theme,
            service_name: ctx
                .service_name
                .as_deref()
                .map(ServiceCategory::parse_or_default)
                .unwrap_or_default(),
            selected_theme: non_empty(ctx.selected_theme.as_deref(), DEFAULT_SELECTED_THEME),
        }
    }

    /// The effective (store, theme) pair after applying the addressing-mode
    /// invariant: in default mode the store is forced to `"default"` and the
    /// theme to the service-category label, regardless of the original
    /// values.
    #[must_use]
    pub fn effective(&self) -> EffectiveKey<'_> {
        if self.use_default_theme {
            EffectiveKey {
                store_id: DEFAULT_STORE_ID,
                theme_id: self.service_name.label(),
            }
        } else {
            EffectiveKey {
                store_id: &self.store_id,
                theme_id: &self.theme_id,
            }
        }
    }
}

/// The mode-normalized (store, theme) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveKey<'a> {
    pub store_id: &'a str,
    pub theme_id: &'a str,
}

fn non_empty(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Accept `0`/`1` as well as `true`/`false`.
fn bool_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrBool {
        Int(u8),
        Bool(bool),
    }

    match IntOrBool::deserialize(deserializer)? {
        IntOrBool::Int(n) => Ok(n != 0),
        IntOrBool::Bool(b) => Ok(b),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_context_yields_all_defaults() {
        let key = ThemeKey::from_context(None);
        assert_eq!(key.store_id, "default");
        assert_eq!(key.theme_id, "default");
        assert!(!key.use_default_theme);
        assert_eq!(key.service_name, ServiceCategory::Grocery);
        assert_eq!(key.selected_theme, "theme1");
    }

    #[test]
    fn test_partial_context_fills_defaults() {
        let ctx = StoreContext {
            store_id: Some("acme".to_string()),
            ..StoreContext::default()
        };
        let key = ThemeKey::from_context(Some(&ctx));
        assert_eq!(key.store_id, "acme");
        assert_eq!(key.theme_id, "default");
        assert_eq!(key.selected_theme, "theme1");
    }

    #[test]
    fn test_empty_strings_are_treated_as_missing() {
        let ctx = StoreContext {
            store_id: Some(String::new()),
            theme_id: Some("  ".to_string()),
            ..StoreContext::default()
        };
        let key = ThemeKey::from_context(Some(&ctx));
        assert_eq!(key.store_id, "default");
        assert_eq!(key.theme_id, "default");
    }

    #[test]
    fn test_unknown_service_name_normalizes_to_default() {
        let ctx = StoreContext {
            service_name: Some("Unknown Category".to_string()),
            ..StoreContext::default()
        };
        let key = ThemeKey::from_context(Some(&ctx));
        assert_eq!(key.service_name, ServiceCategory::Grocery);
    }

    #[test]
    fn test_effective_tenant_mode_passes_through() {
        let key = ThemeKey {
            store_id: "acme".to_string(),
            theme_id: "theme3".to_string(),
            ..ThemeKey::default()
        };
        let eff = key.effective();
        assert_eq!(eff.store_id, "acme");
        assert_eq!(eff.theme_id, "theme3");
    }

    #[test]
    fn test_effective_default_mode_forces_category() {
        let key = ThemeKey {
            store_id: "acme".to_string(),
            theme_id: "theme3".to_string(),
            use_default_theme: true,
            service_name: ServiceCategory::ClothingFashion,
            ..ThemeKey::default()
        };
        let eff = key.effective();
        assert_eq!(eff.store_id, "default");
        assert_eq!(eff.theme_id, "Clothing & Fashion");
    }

    #[test]
    fn test_use_default_theme_deserializes_from_int() {
        let ctx: StoreContext = serde_json::from_str(r#"{"use_default_theme": 1}"#).unwrap();
        assert!(ctx.use_default_theme);

        let ctx: StoreContext = serde_json::from_str(r#"{"use_default_theme": 0}"#).unwrap();
        assert!(!ctx.use_default_theme);

        let ctx: StoreContext = serde_json::from_str(r#"{"use_default_theme": true}"#).unwrap();
        assert!(ctx.use_default_theme);
    }
}
