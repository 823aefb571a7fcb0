// 🏷️ Classification Rules - Rules as Data
// Ordered keyword rules for category detection and attribute lookup.
//
// Every table here is a Vec evaluated front to back. The first matching rule
// wins, so the order of a table is part of its meaning.

use crate::entities::CategoryTag;
use serde::{Deserialize, Serialize};

// ============================================================================
// KEYWORD RULE
// ============================================================================

/// One `(keyword, display value)` pair in an attribute table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Lower-case substring to look for
    pub keyword: String,

    /// What the keyword resolves to (e.g., "Velvet", "Platform Bed")
    pub value: String,
}

impl KeywordRule {
    pub fn new(keyword: impl Into<String>, value: impl Into<String>) -> Self {
        KeywordRule {
            keyword: keyword.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive containment check
    pub fn matches(&self, text: &str) -> bool {
        !self.keyword.is_empty() && text.to_lowercase().contains(&self.keyword.to_lowercase())
    }
}

/// Build a table from `(keyword, value)` literals, preserving order
pub fn keyword_table(pairs: &[(&str, &str)]) -> Vec<KeywordRule> {
    pairs
        .iter()
        .map(|(keyword, value)| KeywordRule::new(*keyword, *value))
        .collect()
}

/// First rule in table order whose keyword occurs in `text`
pub fn first_match<'a>(rules: &'a [KeywordRule], text: &str) -> Option<&'a KeywordRule> {
    let text_lower = text.to_lowercase();
    rules
        .iter()
        .find(|rule| !rule.keyword.is_empty() && text_lower.contains(&rule.keyword.to_lowercase()))
}

// ============================================================================
// CATEGORY RULE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Rule ID for tracing and tests
    pub id: String,

    /// Fires when ANY of these phrases occurs...
    pub any_of: Vec<String>,

    /// ...and NONE of these does
    #[serde(default)]
    pub none_of: Vec<String>,

    pub category: CategoryTag,
}

impl CategoryRule {
    pub fn new(id: &str, any_of: &[&str], none_of: &[&str], category: CategoryTag) -> Self {
        CategoryRule {
            id: id.to_string(),
            any_of: any_of.iter().map(|s| s.to_string()).collect(),
            none_of: none_of.iter().map(|s| s.to_string()).collect(),
            category,
        }
    }

    /// Check the rule against already lower-cased text
    pub fn matches(&self, text_lower: &str) -> bool {
        let hit = self
            .any_of
            .iter()
            .any(|phrase| !phrase.is_empty() && text_lower.contains(&phrase.to_lowercase()));
        if !hit {
            return false;
        }

        !self
            .none_of
            .iter()
            .any(|phrase| !phrase.is_empty() && text_lower.contains(&phrase.to_lowercase()))
    }
}

// ============================================================================
// CLASSIFICATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub category: CategoryTag,

    /// Rule that fired (None = default category)
    pub rule_id: Option<String>,
}

// ============================================================================
// CATEGORY CLASSIFIER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
    default_category: CategoryTag,
}

impl CategoryClassifier {
    /// Create classifier from an ordered list of rules.
    ///
    /// Rules are NOT re-sorted: list position is precedence.
    pub fn from_rules(rules: Vec<CategoryRule>, default_category: CategoryTag) -> Self {
        CategoryClassifier {
            rules,
            default_category,
        }
    }

    /// Category for a RAW (not normalized) title
    pub fn classify(&self, raw_title: &str) -> CategoryTag {
        self.explain(raw_title).category
    }

    /// Same as `classify`, also reporting which rule fired
    pub fn explain(&self, raw_title: &str) -> ClassificationResult {
        let text_lower = raw_title.to_lowercase();

        for rule in &self.rules {
            if rule.matches(&text_lower) {
                return ClassificationResult {
                    category: rule.category,
                    rule_id: Some(rule.id.clone()),
                };
            }
        }

        ClassificationResult {
            category: self.default_category,
            rule_id: None,
        }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn default_category(&self) -> CategoryTag {
        self.default_category
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        CategoryClassifier::from_rules(
            vec![
                CategoryRule::new(
                    "nightstands",
                    &["nightstand", "bedside"],
                    &["bed frame"],
                    CategoryTag::Nightstands,
                ),
                CategoryRule::new("chaise", &["chaise", "daybed"], &[], CategoryTag::Chaise),
                CategoryRule::new("sofas", &["sofa", "couch", "sectional"], &[], CategoryTag::Sofas),
                CategoryRule::new("dining", &["dining"], &[], CategoryTag::Dining),
                CategoryRule::new("beds", &["bed"], &["sofa bed", "bedside"], CategoryTag::Beds),
                CategoryRule::new("chairs", &["chair"], &["gaming"], CategoryTag::Chairs),
                CategoryRule::new("tv", &["tv", "console", "entertainment"], &[], CategoryTag::Tv),
                CategoryRule::new("wardrobes", &["wardrobe", "closet"], &[], CategoryTag::Wardrobes),
                CategoryRule::new("tables", &["coffee table", "side table"], &[], CategoryTag::Tables),
            ],
            CategoryTag::Tables,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_rule_match() {
        let rule = KeywordRule::new("velvet", "Velvet");

        assert!(rule.matches("Luxury VELVET Bed"));
        assert!(!rule.matches("Linen Bed"));
        assert!(!KeywordRule::new("", "Empty").matches("anything"));
    }

    #[test]
    fn test_first_match_respects_table_order() {
        let table = keyword_table(&[("platform bed", "Platform Bed"), ("bed", "Bed")]);

        assert_eq!(first_match(&table, "velvet platform bed").unwrap().value, "Platform Bed");
        assert_eq!(first_match(&table, "storage bed").unwrap().value, "Bed");
        assert!(first_match(&table, "sofa").is_none());
    }

    #[test]
    fn test_default_rule_order_is_fixed() {
        let classifier = CategoryClassifier::default();
        let ids: Vec<&str> = classifier.rules().iter().map(|r| r.id.as_str()).collect();

        assert_eq!(
            ids,
            vec![
                "nightstands", "chaise", "sofas", "dining", "beds", "chairs", "tv",
                "wardrobes", "tables"
            ]
        );
        assert_eq!(classifier.default_category(), CategoryTag::Tables);
    }

    #[test]
    fn test_nightstand_wins_over_bed() {
        let classifier = CategoryClassifier::default();

        assert_eq!(
            classifier.classify("Modern Nightstand Bedside Table"),
            CategoryTag::Nightstands
        );
        assert_eq!(
            classifier.classify("Oak Bed Frame with Nightstand"),
            CategoryTag::Beds
        );
    }

    #[test]
    fn test_chaise_and_daybed_before_sofa() {
        let classifier = CategoryClassifier::default();

        assert_eq!(classifier.classify("Leather Chaise Sofa"), CategoryTag::Chaise);
        assert_eq!(classifier.classify("Velvet Daybed"), CategoryTag::Chaise);
    }

    #[test]
    fn test_sofa_bed_is_a_sofa() {
        let classifier = CategoryClassifier::default();
        assert_eq!(classifier.classify("Italian Leather Sofa Bed"), CategoryTag::Sofas);
    }

    #[test]
    fn test_gaming_chair_is_not_a_chair() {
        let classifier = CategoryClassifier::default();

        assert_eq!(classifier.classify("Velvet Accent Chair"), CategoryTag::Chairs);
        // Falls through to the default
        assert_eq!(classifier.classify("RGB Gaming Chair"), CategoryTag::Tables);
    }

    #[test]
    fn test_remaining_rules() {
        let classifier = CategoryClassifier::default();

        assert_eq!(classifier.classify("Marble Dining Table"), CategoryTag::Dining);
        assert_eq!(classifier.classify("Walnut TV Stand"), CategoryTag::Tv);
        assert_eq!(classifier.classify("Media Console"), CategoryTag::Tv);
        assert_eq!(classifier.classify("Sliding Door Wardrobe"), CategoryTag::Wardrobes);
        assert_eq!(classifier.classify("Walk In Closet System"), CategoryTag::Wardrobes);
        assert_eq!(classifier.classify("Glass Coffee Table"), CategoryTag::Tables);
    }

    #[test]
    fn test_default_category() {
        let classifier = CategoryClassifier::default();
        let result = classifier.explain("");

        assert_eq!(result.category, CategoryTag::Tables);
        assert_eq!(result.rule_id, None);
    }

    #[test]
    fn test_explain_reports_rule() {
        let classifier = CategoryClassifier::default();
        let result = classifier.explain("Upholstered Platform Bed");

        assert_eq!(result.category, CategoryTag::Beds);
        assert_eq!(result.rule_id, Some("beds".to_string()));
    }

    #[test]
    fn test_classifier_from_json() {
        let json = r#"{
            "rules": [
                { "id": "x", "any_of": ["ottoman"], "category": "chairs" }
            ],
            "default_category": "beds"
        }"#;
        let classifier: CategoryClassifier = serde_json::from_str(json).unwrap();

        assert_eq!(classifier.rule_count(), 1);
        assert_eq!(classifier.classify("Round Ottoman"), CategoryTag::Chairs);
        assert_eq!(classifier.classify("Sofa"), CategoryTag::Beds);
    }
}
