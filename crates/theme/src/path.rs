//! Candidate fragment locations for a logical slot.
//!
//! A slot resolves against two ordered locations: the store-specific path
//! and the business-category default path. Both are relative, slash
//! separated, extension free - the [`crate::source::ComponentSource`]
//! decides what a path means on its storage.

use crate::key::{DEFAULT_STORE_ID, ThemeKey};

/// A relative fragment location, e.g. `acme/theme3/components/Navbar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentPath(String);

impl FragmentPath {
    pub(crate) fn new(path: String) -> Self {
        Self(path)
    }

    /// The location as a relative slash-separated string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether any segment would escape the storage root.
    #[must_use]
    pub fn has_parent_traversal(&self) -> bool {
        self.0.split('/').any(|segment| segment == "..")
    }
}

impl std::fmt::Display for FragmentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two ordered candidate locations for one slot.
///
/// `primary` is always attempted first; `fallback` only after a primary
/// load failure. When the key is in default mode the primary already
/// addresses the business-category default - the fallback is then a second,
/// textually distinct default that adds the `selected_theme` sub-variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePaths {
    pub primary: FragmentPath,
    pub fallback: FragmentPath,
}

impl CandidatePaths {
    /// Compute both candidate locations for a slot under a key.
    #[must_use]
    pub fn resolve(key: &ThemeKey, slot: &str) -> Self {
        let name = normalize_slot_name(slot);
        let effective = key.effective();

        let primary = FragmentPath::new(format!(
            "{}/{}/components/{name}",
            effective.store_id, effective.theme_id
        ));
        let fallback = FragmentPath::new(format!(
            "{DEFAULT_STORE_ID}/{}/{}/components/{name}",
            key.service_name.label(),
            key.selected_theme
        ));

        Self { primary, fallback }
    }
}

/// Strip a single leading `./` or `/` from a logical slot name.
#[must_use]
pub fn normalize_slot_name(slot: &str) -> &str {
    slot.strip_prefix("./")
        .or_else(|| slot.strip_prefix('/'))
        .unwrap_or(slot)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vitrine_core::ServiceCategory;

    fn tenant_key(store: &str, theme: &str) -> ThemeKey {
        ThemeKey {
            store_id: store.to_string(),
            theme_id: theme.to_string(),
            ..ThemeKey::default()
        }
    }

    #[test]
    fn test_normalize_strips_leading_dot_slash() {
        assert_eq!(normalize_slot_name("./Navbar"), "Navbar");
        assert_eq!(normalize_slot_name("/profile/ProfileCard"), "profile/ProfileCard");
        assert_eq!(normalize_slot_name("Hero"), "Hero");
    }

    #[test]
    fn test_tenant_mode_primary_path() {
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme3"), "Navbar");
        assert_eq!(paths.primary.as_str(), "acme/theme3/components/Navbar");
    }

    #[test]
    fn test_tenant_mode_fallback_uses_category_and_variant() {
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme3"), "Navbar");
        assert_eq!(paths.fallback.as_str(), "default/Grocery/theme1/components/Navbar");
    }

    #[test]
    fn test_default_mode_overrides_store_and_theme() {
        let key = ThemeKey {
            store_id: "acme".to_string(),
            theme_id: "theme3".to_string(),
            use_default_theme: true,
            service_name: ServiceCategory::Electronics,
            ..ThemeKey::default()
        };
        let paths = CandidatePaths::resolve(&key, "Hero");
        assert_eq!(paths.primary.as_str(), "default/Electronics/components/Hero");
        // Still a distinct second default carrying the sub-variant.
        assert_eq!(paths.fallback.as_str(), "default/Electronics/theme1/components/Hero");
        assert_ne!(paths.primary, paths.fallback);
    }

    #[test]
    fn test_nested_slot_names_are_preserved() {
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme1"), "./profile/ProfileCard");
        assert_eq!(
            paths.primary.as_str(),
            "acme/theme1/components/profile/ProfileCard"
        );
    }

    #[test]
    fn test_parent_traversal_detection() {
        let paths = CandidatePaths::resolve(&tenant_key("acme", "theme1"), "../secrets");
        assert!(paths.primary.has_parent_traversal());

        let safe = CandidatePaths::resolve(&tenant_key("acme", "theme1"), "Navbar");
        assert!(!safe.primary.has_parent_traversal());
    }
}
