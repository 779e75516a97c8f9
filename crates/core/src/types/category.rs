//! Business-category enumeration for store classification.
//!
//! Every store is classified into one of a fixed set of retail categories.
//! The category selects the default theme family a store falls back to when
//! it has no bespoke theme component for a UI slot.

use serde::{Deserialize, Serialize};

/// Business category of a store.
///
/// The set is closed: tenant records carry free-form category strings, and
/// anything outside this list normalizes to [`ServiceCategory::Grocery`],
/// the documented default. Use [`ServiceCategory::parse_or_default`] at the
/// boundary rather than `FromStr`, which would force callers to invent an
/// error path that cannot occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ServiceCategory {
    #[default]
    Grocery,
    ClothingFashion,
    Electronics,
    HomeDecor,
    BeautyCosmetics,
    Restaurant,
    ToysGames,
}

impl ServiceCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 7] = [
        Self::Grocery,
        Self::ClothingFashion,
        Self::Electronics,
        Self::HomeDecor,
        Self::BeautyCosmetics,
        Self::Restaurant,
        Self::ToysGames,
    ];

    /// The human-facing label, also used as the path segment in default
    /// theme locations (e.g. `default/Grocery/theme1/components/Navbar`).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Grocery => "Grocery",
            Self::ClothingFashion => "Clothing & Fashion",
            Self::Electronics => "Electronics",
            Self::HomeDecor => "Home & Decor",
            Self::BeautyCosmetics => "Beauty & Cosmetics",
            Self::Restaurant => "Restaurant",
            Self::ToysGames => "Toys & Games",
        }
    }

    /// Parse a category label, normalizing unrecognized values to the
    /// default category.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_label() {
        assert_eq!(
            ServiceCategory::parse_or_default("Clothing & Fashion"),
            ServiceCategory::ClothingFashion
        );
        assert_eq!(
            ServiceCategory::parse_or_default("Grocery"),
            ServiceCategory::Grocery
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            ServiceCategory::parse_or_default("electronics"),
            ServiceCategory::Electronics
        );
        assert_eq!(
            ServiceCategory::parse_or_default("  toys & games "),
            ServiceCategory::ToysGames
        );
    }

    #[test]
    fn test_unknown_category_falls_back_to_grocery() {
        assert_eq!(
            ServiceCategory::parse_or_default("Unknown Category"),
            ServiceCategory::Grocery
        );
        assert_eq!(
            ServiceCategory::parse_or_default(""),
            ServiceCategory::Grocery
        );
    }

    #[test]
    fn test_display_matches_label() {
        for category in ServiceCategory::ALL {
            assert_eq!(category.to_string(), category.label());
        }
    }
}
