// 🏛️ Attribute Extractors - Material, style and type from a normalized title
//
// Three independent lookups. Each table is ordered; the first keyword found
// wins and each has its own fallback:
//   material → ""          (nothing mentioned)
//   style    → "Modern"
//   type     → category id, title-cased

use crate::entities::CategoryTag;
use crate::rules::{first_match, keyword_table, KeywordRule};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STYLE: &str = "Modern";

// ============================================================================
// EXTRACTED ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    /// Empty when no material keyword occurs
    pub material: String,
    pub style: String,
    pub product_type: String,
}

impl ProductAttributes {
    pub fn has_material(&self) -> bool {
        !self.material.is_empty()
    }
}

// ============================================================================
// ATTRIBUTE TABLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeTables {
    pub materials: Vec<KeywordRule>,
    pub styles: Vec<KeywordRule>,
    pub default_style: String,

    /// Most specific phrase first; generic "bed" is last
    pub types: Vec<KeywordRule>,
}

impl AttributeTables {
    /// Extract all three attributes from NORMALIZED text
    pub fn extract(&self, normalized: &str, category: CategoryTag) -> ProductAttributes {
        ProductAttributes {
            material: self.material(normalized),
            style: self.style(normalized),
            product_type: self.product_type(normalized, category),
        }
    }

    pub fn material(&self, normalized: &str) -> String {
        first_match(&self.materials, normalized)
            .map(|rule| rule.value.clone())
            .unwrap_or_default()
    }

    pub fn style(&self, normalized: &str) -> String {
        first_match(&self.styles, normalized)
            .map(|rule| rule.value.clone())
            .unwrap_or_else(|| self.default_style.clone())
    }

    pub fn product_type(&self, normalized: &str, category: CategoryTag) -> String {
        first_match(&self.types, normalized)
            .map(|rule| rule.value.clone())
            .unwrap_or_else(|| category.title_case())
    }

    pub fn is_default_style(&self, style: &str) -> bool {
        style == self.default_style
    }
}

impl Default for AttributeTables {
    fn default() -> Self {
        AttributeTables {
            materials: keyword_table(&[
                ("velvet", "Velvet"),
                ("bouclé", "Bouclé"),
                ("boucle", "Bouclé"),
                ("leather", "Leather"),
                ("linen", "Linen"),
                ("marble", "Marble"),
                ("sintered", "Sintered Stone"),
                ("travertine", "Travertine"),
                ("glass", "Glass"),
                ("oak", "Oak"),
                ("walnut", "Walnut"),
                ("teak", "Teak"),
                ("wood", "Wood"),
                ("brass", "Brass"),
                ("gold", "Gold-Accented"),
                ("chrome", "Chrome"),
            ]),
            styles: keyword_table(&[
                ("modern", "Modern"),
                ("minimalist", "Minimalist"),
                ("nordic", "Nordic"),
                ("italian", "Italian"),
                ("contemporary", "Contemporary"),
                ("mid century", "Mid-Century"),
                ("art deco", "Art Deco"),
                ("curved", "Curved"),
                ("tufted", "Tufted"),
                ("channel", "Channel-Tufted"),
                ("wingback", "Wingback"),
                ("floating", "Floating"),
                ("upholstered", "Upholstered"),
            ]),
            default_style: DEFAULT_STYLE.to_string(),
            types: keyword_table(&[
                ("chaise lounge", "Chaise Longue"),
                ("chaise", "Chaise Longue"),
                ("daybed", "Day Bed"),
                ("platform bed", "Platform Bed"),
                ("storage bed", "Storage Bed"),
                ("bed frame", "Bed"),
                ("l-shape sectional", "L-Shape Sectional"),
                ("l-shape", "L-Shape Sectional"),
                ("l shape", "L-Shape Sectional"),
                ("corner sofa", "Corner Sectional"),
                ("sectional", "Sectional"),
                ("sofa bed", "Sofa Bed"),
                ("sofa", "Sofa"),
                ("couch", "Sofa"),
                ("dining table", "Dining Table"),
                ("dining set", "Dining Collection"),
                ("nightstand", "Nightstand"),
                ("bedside table", "Nightstand"),
                ("bedside", "Nightstand"),
                ("night table", "Nightstand"),
                ("coffee table", "Coffee Table"),
                ("side table", "Side Table"),
                ("console table", "Console Table"),
                ("accent chair", "Accent Chair"),
                ("wingback", "Wingback Chair"),
                ("armchair", "Armchair"),
                ("lounge chair", "Lounge Chair"),
                ("chair", "Chair"),
                ("tv cabinet", "Media Console"),
                ("tv stand", "TV Console"),
                ("tv console", "TV Console"),
                ("media console", "Media Console"),
                ("entertainment", "Entertainment Unit"),
                ("walk in wardrobe", "Walk-In Wardrobe"),
                ("wardrobe", "Wardrobe"),
                ("closet", "Wardrobe System"),
                ("dressing table", "Dressing Table"),
                ("vanity", "Vanity Table"),
                ("chest of drawer", "Chest of Drawers"),
                ("dresser", "Chest of Drawers"),
                ("ottoman", "Ottoman"),
                ("pouf", "Pouf"),
                ("bench", "Bench"),
                ("mattress", "Mattress"),
                ("bookshelf", "Bookshelf"),
                ("shelf", "Shelf Unit"),
                ("bed", "Bed"),
            ]),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
