// 🧹 Lexical Normalizer - Strip marketplace boilerplate from titles
//
// "Hot Sale 2025 Modern Velvet Bed Free Shipping" → "modern velvet bed"
//
// Phrases are removed as literal substrings (no pattern syntax), each
// occurrence replaced by a space so neighbouring words never fuse.

use serde::{Deserialize, Serialize};

/// Boilerplate phrases in removal order
pub const DEFAULT_STRIP_PHRASES: &[&str] = &[
    "free shipping", "hot sale", "new arrival", "best seller",
    "factory direct", "wholesale", "dropshipping", "in stock",
    "2024", "2025", "2026", "2027", "promotion", "special offer",
    "high quality", "top quality", "brand new", "100% new",
    "fast delivery", "big sale", "flash sale", "limited time",
    "for home", "for living room", "for bedroom", "for house",
    "home decoration", "home furniture", "house furniture",
    "european style", "american style", "simple modern",
    "hot", "new", "sale", "good quality", "premium quality",
    "home",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalNormalizer {
    pub strip_phrases: Vec<String>,
}

impl LexicalNormalizer {
    pub fn new(strip_phrases: Vec<String>) -> Self {
        LexicalNormalizer { strip_phrases }
    }

    /// Lower-case, strip boilerplate, collapse whitespace.
    ///
    /// Removing one phrase can bring the words of another together
    /// ("for 2024 living room" → "for living room"), so passes repeat until
    /// nothing changes.
    /// The result is therefore a fixed point: normalizing it again is a no-op.
    pub fn normalize(&self, raw_title: &str) -> String {
        let mut text = collapse_whitespace(&raw_title.to_lowercase());

        loop {
            let next = self.strip_pass(&text);
            if next == text {
                return text;
            }
            text = next;
        }
    }

    /// One sweep over the phrase list in order
    fn strip_pass(&self, text: &str) -> String {
        let mut out = text.to_string();

        for phrase in &self.strip_phrases {
            let phrase = phrase.trim().to_lowercase();
            if phrase.is_empty() {
                continue;
            }
            if out.contains(&phrase) {
                out = out.replace(&phrase, " ");
            }
        }

        collapse_whitespace(&out)
    }

    /// Phrases contained in a longer phrase listed BEFORE them.
    ///
    /// The longer phrase is already gone by the time the shorter one is
    /// tried, so these pairs are harmless. Returns `(longer, shorter)`.
    pub fn shadowed_phrases(&self) -> Vec<(String, String)> {
        let phrases = self.lowered_phrases();
        let mut pairs = Vec::new();

        for (i, longer) in phrases.iter().enumerate() {
            for shorter in phrases.iter().skip(i + 1) {
                if longer != shorter && longer.contains(shorter.as_str()) {
                    pairs.push((longer.clone(), shorter.clone()));
                }
            }
        }

        pairs
    }

    /// Phrases that contain a shorter phrase listed BEFORE them.
    ///
    /// The shorter one is removed first and splits the longer phrase, which
    /// then never matches as a whole. Returns `(shorter, longer)`.
    pub fn masked_phrases(&self) -> Vec<(String, String)> {
        let phrases = self.lowered_phrases();
        let mut pairs = Vec::new();

        for (i, shorter) in phrases.iter().enumerate() {
            for longer in phrases.iter().skip(i + 1) {
                if longer != shorter && longer.contains(shorter.as_str()) {
                    pairs.push((shorter.clone(), longer.clone()));
                }
            }
        }

        pairs
    }

    fn lowered_phrases(&self) -> Vec<String> {
        self.strip_phrases
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

impl Default for LexicalNormalizer {
    fn default() -> Self {
        LexicalNormalizer::new(DEFAULT_STRIP_PHRASES.iter().map(|s| s.to_string()).collect())
    }
}

/// Runs of whitespace → single space, trimmed
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_marketing_phrases() {
        let normalizer = LexicalNormalizer::default();
        let out = normalizer.normalize(
            "Hot Sale 2025 Modern Luxury Velvet Platform Bed King Size For Bedroom Free Shipping",
        );

        assert_eq!(out, "modern luxury velvet platform bed king size");
    }

    #[test]
    fn test_coffee_table_title_loses_home() {
        let normalizer = LexicalNormalizer::default();
        let out = normalizer.normalize(
            "Modern Wood Leg Square Coffee Table Sets Home Center Table with Storage Drawers",
        );

        assert!(!out.contains("home"));
        assert!(!out.contains("premium quality"));
        assert_eq!(
            out,
            "modern wood leg square coffee table sets center table with storage drawers"
        );
    }

    #[test]
    fn test_phrases_never_fuse_neighbours() {
        let normalizer = LexicalNormalizer::default();
        assert_eq!(normalizer.normalize("oakNEWwalnut"), "oak walnut");
    }

    #[test]
    fn test_repeats_until_stable() {
        let normalizer = LexicalNormalizer::default();
        // Stripping "2024" exposes "for living room", which then goes too
        let out = normalizer.normalize("Velvet Bed for 2024 living room");
        assert_eq!(out, "velvet bed");
    }

    #[test]
    fn test_empty_and_blank_titles() {
        let normalizer = LexicalNormalizer::default();

        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \t\n "), "");
        assert_eq!(normalizer.normalize("Free Shipping"), "");
    }

    #[test]
    fn test_phrase_with_regex_metacharacters_is_literal() {
        let normalizer = LexicalNormalizer::new(vec!["100% new".to_string(), "(x)".to_string()]);
        assert_eq!(normalizer.normalize("Sofa 100% New (x) Grey"), "sofa grey");
    }

    #[test]
    fn test_default_list_overlap_report() {
        let normalizer = LexicalNormalizer::default();

        // "sale" appears after "hot sale", "big sale", "flash sale": shadowed, harmless
        let shadowed = normalizer.shadowed_phrases();
        assert!(shadowed.contains(&("hot sale".to_string(), "sale".to_string())));
        assert!(shadowed.contains(&("home furniture".to_string(), "home".to_string())));

        // No short phrase is listed ahead of a longer one containing it
        assert!(normalizer.masked_phrases().is_empty());
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(title in "[a-zA-Z0-9% ]{0,80}") {
            let normalizer = LexicalNormalizer::default();
            let once = normalizer.normalize(&title);
            prop_assert_eq!(normalizer.normalize(&once), once.clone());
        }

        #[test]
        fn prop_normalize_output_is_collapsed(title in "\\PC{0,60}") {
            let normalizer = LexicalNormalizer::default();
            let out = normalizer.normalize(&title);
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
