// 🏷️ Category Tag - Closed set of catalog departments
//
// Every curated product lands in exactly one department. The tag is the key
// for collection words, description pools and the per-category name counter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CATEGORY TAG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTag {
    Beds,
    Sofas,
    Dining,
    Chairs,
    Tv,
    Wardrobes,
    Tables,
    Nightstands,
    Chaise,
}

impl CategoryTag {
    /// All tags in catalog display order
    pub const ALL: [CategoryTag; 9] = [
        CategoryTag::Beds,
        CategoryTag::Sofas,
        CategoryTag::Dining,
        CategoryTag::Chairs,
        CategoryTag::Tv,
        CategoryTag::Wardrobes,
        CategoryTag::Tables,
        CategoryTag::Nightstands,
        CategoryTag::Chaise,
    ];

    /// Stable identifier used in storage and URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::Beds => "beds",
            CategoryTag::Sofas => "sofas",
            CategoryTag::Dining => "dining",
            CategoryTag::Chairs => "chairs",
            CategoryTag::Tv => "tv",
            CategoryTag::Wardrobes => "wardrobes",
            CategoryTag::Tables => "tables",
            CategoryTag::Nightstands => "nightstands",
            CategoryTag::Chaise => "chaise",
        }
    }

    /// Storefront label
    pub fn label(&self) -> &'static str {
        match self {
            CategoryTag::Beds => "Beds",
            CategoryTag::Sofas => "Sofas & Couches",
            CategoryTag::Dining => "Dining Tables",
            CategoryTag::Chairs => "Accent Chairs",
            CategoryTag::Tv => "TV Cabinets",
            CategoryTag::Wardrobes => "Wardrobes",
            CategoryTag::Tables => "Coffee Tables",
            CategoryTag::Nightstands => "Nightstands",
            CategoryTag::Chaise => "Chaise Longues",
        }
    }

    /// Identifier with the first letter upper-cased ("tv" → "Tv").
    ///
    /// Used as the product type when no type keyword matches.
    pub fn title_case(&self) -> String {
        let id = self.as_str();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        CategoryTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for tag in CategoryTag::ALL {
            assert_eq!(tag.as_str().parse::<CategoryTag>().unwrap(), tag);
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(" Sofas ".parse::<CategoryTag>().unwrap(), CategoryTag::Sofas);
        assert!("ottoman".parse::<CategoryTag>().is_err());
    }

    #[test]
    fn test_category_title_case() {
        assert_eq!(CategoryTag::Tv.title_case(), "Tv");
        assert_eq!(CategoryTag::Nightstands.title_case(), "Nightstands");
    }

    #[test]
    fn test_category_serializes_as_lowercase_id() {
        let json = serde_json::to_string(&CategoryTag::Nightstands).unwrap();
        assert_eq!(json, "\"nightstands\"");

        let tag: CategoryTag = serde_json::from_str("\"tv\"").unwrap();
        assert_eq!(tag, CategoryTag::Tv);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(CategoryTag::Sofas.label(), "Sofas & Couches");
        assert_eq!(CategoryTag::Tv.label(), "TV Cabinets");
    }
}
