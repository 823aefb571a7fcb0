// ✍️ Name Synthesizer - Brand names from raw marketplace titles
//
// "Hot Sale Modern Luxury Velvet Platform Bed King Size" → "Milano Velvet Platform Bed"
//
// Name = [collection word, material?, style?, type]. The collection word
// rotates per category, and a registry of every name handed out this session
// steers the next pick away from collisions.

use crate::attributes::{AttributeTables, ProductAttributes};
use crate::entities::{CatalogEntry, CategoryTag};
use crate::normalizer::LexicalNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ============================================================================
// NAMING POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionWords {
    pub category: CategoryTag,
    pub words: Vec<String>,
}

impl CollectionWords {
    pub fn new(category: CategoryTag, words: &[&str]) -> Self {
        CollectionWords {
            category,
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingPolicy {
    pub collections: Vec<CollectionWords>,

    /// Used for a category with no (or an empty) collection list
    pub fallback_words: Vec<String>,
}

impl NamingPolicy {
    pub fn words_for(&self, category: CategoryTag) -> &[String] {
        self.collections
            .iter()
            .find(|c| c.category == category && !c.words.is_empty())
            .map(|c| c.words.as_slice())
            .unwrap_or(self.fallback_words.as_slice())
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        NamingPolicy {
            collections: vec![
                CollectionWords::new(
                    CategoryTag::Beds,
                    &["Milano", "Aurora", "Torino", "Riviera", "Palazzo", "Sienna", "Monaco", "Capri", "Verona", "Portofino"],
                ),
                CollectionWords::new(
                    CategoryTag::Sofas,
                    &["Sahara", "Zephyr", "Mayfair", "Belgravia", "Kensington", "Chelsea", "Amalfi", "Como", "Positano", "Riviera"],
                ),
                CollectionWords::new(
                    CategoryTag::Dining,
                    &["Carrara", "Firenze", "Tuscany", "Provence", "Vienna", "Geneva", "Nordic", "Lucerne", "Basel", "Zurich"],
                ),
                CollectionWords::new(
                    CategoryTag::Chairs,
                    &["Windsor", "Hampton", "Aspen", "Marbella", "Ravello", "Taormina", "Sorrento", "Bergamo", "Portofino", "Capri"],
                ),
                CollectionWords::new(
                    CategoryTag::Tv,
                    &["Palazzo", "Gallery", "Studio", "Atelier", "Soho", "Tribeca", "Maison", "Meridian", "Moderne", "Chelsea"],
                ),
                CollectionWords::new(
                    CategoryTag::Wardrobes,
                    &["Maison", "Grande", "Regency", "Imperial", "Sovereign", "Regal", "Estate", "Manor", "Chateau", "Villa"],
                ),
                CollectionWords::new(
                    CategoryTag::Tables,
                    &["Infinity", "Meridian", "Solstice", "Eclipse", "Zenith", "Apex", "Atlas", "Nova", "Summit", "Pinnacle"],
                ),
                CollectionWords::new(
                    CategoryTag::Nightstands,
                    &["Luna", "Stella", "Nova", "Celeste", "Aria", "Lux", "Prima", "Elite", "Serene", "Dusk"],
                ),
                CollectionWords::new(
                    CategoryTag::Chaise,
                    &["Riviera", "Amalfi", "Como", "Portofino", "Capri", "Monaco", "Antibes", "Cannes", "Sorrento", "Positano"],
                ),
            ],
            fallback_words: ["Unicorn", "Elite", "Prima", "Luxe", "Regal"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

// ============================================================================
// NAME REGISTRY
// ============================================================================

/// Session state behind the synthesizer: rotation counters and used names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameRegistry {
    counters: HashMap<CategoryTag, usize>,
    used_names: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, category: CategoryTag) -> usize {
        self.counters.get(&category).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used_names.contains(name)
    }

    pub fn used_count(&self) -> usize {
        self.used_names.len()
    }

    fn set_counter(&mut self, category: CategoryTag, value: usize) {
        self.counters.insert(category, value);
    }

    fn insert_name(&mut self, name: String) -> bool {
        self.used_names.insert(name)
    }
}

// ============================================================================
// SYNTHESIZED NAME
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedName {
    pub name: String,

    /// Collection word actually used (after collision avoidance)
    pub collection: Option<String>,

    pub attributes: ProductAttributes,

    /// True when the first pick was already taken
    pub rerouted: bool,
}

// ============================================================================
// NAME SYNTHESIZER
// ============================================================================

#[derive(Debug, Clone)]
pub struct NameSynthesizer {
    normalizer: LexicalNormalizer,
    attributes: AttributeTables,
    policy: NamingPolicy,
    registry: NameRegistry,
}

impl NameSynthesizer {
    pub fn new(normalizer: LexicalNormalizer, attributes: AttributeTables, policy: NamingPolicy) -> Self {
        NameSynthesizer {
            normalizer,
            attributes,
            policy,
            registry: NameRegistry::new(),
        }
    }

    /// Curated name for a raw title. Advances the category counter.
    pub fn synthesize(&mut self, raw_title: &str, category: CategoryTag) -> String {
        self.synthesize_detailed(raw_title, category).name
    }

    pub fn synthesize_detailed(&mut self, raw_title: &str, category: CategoryTag) -> SynthesizedName {
        let normalized = self.normalizer.normalize(raw_title);
        let attributes = self.attributes.extract(&normalized, category);

        let words = self.policy.words_for(category);
        let idx = self.registry.counter(category);

        let mut collection = pick(words, idx);
        self.registry.set_counter(category, idx + 1);

        let mut name = self.compose(collection, &attributes);
        let mut rerouted = false;

        if self.registry.contains(&name) {
            // Next rotation slot, not a retry of the same one
            collection = pick(words, idx + 1);
            name = self.compose(collection, &attributes);
            self.registry.set_counter(category, idx + 2);
            rerouted = true;
        }

        self.registry.insert_name(name.clone());

        SynthesizedName {
            name,
            collection: collection.map(str::to_string),
            attributes,
            rerouted,
        }
    }

    /// Replay persisted entries so a restarted process continues the rotation
    /// and knows every name already in the catalog.
    pub fn rebuild_from_catalog(&mut self, entries: &[CatalogEntry]) {
        self.registry = NameRegistry::new();

        for entry in entries {
            let next = self.registry.counter(entry.category) + 1;
            self.registry.set_counter(entry.category, next);
            self.registry.insert_name(entry.curated_name.clone());
        }
    }

    /// Mark a name as taken without touching any counter.
    ///
    /// Returns false if it was already taken.
    #[cfg(test)]
    fn reserve(&mut self, name: &str) -> bool {
        self.registry.insert_name(name.to_string())
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// `[collection, material?, style if non-default or no material, type]`
    fn compose(&self, collection: Option<&str>, attributes: &ProductAttributes) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4);

        if let Some(word) = collection {
            parts.push(word);
        }
        if attributes.has_material() {
            parts.push(&attributes.material);
        }
        if !self.attributes.is_default_style(&attributes.style) || !attributes.has_material() {
            parts.push(&attributes.style);
        }
        parts.push(&attributes.product_type);

        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for NameSynthesizer {
    fn default() -> Self {
        NameSynthesizer::new(
            LexicalNormalizer::default(),
            AttributeTables::default(),
            NamingPolicy::default(),
        )
    }
}

fn pick(words: &[String], idx: usize) -> Option<&str> {
    if words.is_empty() {
        None
    } else {
        Some(words[idx % words.len()].as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::BadgeTag;
    use chrono::Utc;

    fn create_test_entry(name: &str, category: CategoryTag) -> CatalogEntry {
        CatalogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            raw_title: "raw".to_string(),
            curated_name: name.to_string(),
            category,
            cost_in_source_currency: 100.0,
            retail_price: 1099,
            was_price: 1399,
            margin_percent: 67,
            profit_in_dest_currency: 732,
            images: vec![],
            colors_text: String::new(),
            sizes_text: String::new(),
            badge: BadgeTag::BestSeller,
            quality_score: 58,
            description: String::new(),
            source_url: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_synthesize_velvet_platform_bed() {
        let mut synth = NameSynthesizer::default();
        let name = synth.synthesize(
            "Hot Sale 2025 Modern Luxury Velvet Platform Bed King Size Hydraulic Storage Free Shipping",
            CategoryTag::Beds,
        );

        // Material present and style is the default, so style is left out
        assert_eq!(name, "Milano Velvet Platform Bed");
        assert_eq!(synth.registry().counter(CategoryTag::Beds), 1);
    }

    #[test]
    fn test_style_included_when_not_default() {
        let mut synth = NameSynthesizer::default();
        let name = synth.synthesize("Italian Leather Sofa Bed", CategoryTag::Sofas);

        assert_eq!(name, "Sahara Leather Italian Sofa Bed");
    }

    #[test]
    fn test_default_style_included_without_material() {
        let mut synth = NameSynthesizer::default();
        let name = synth.synthesize("Simple Bedside Table With Drawer", CategoryTag::Nightstands);

        assert_eq!(name, "Luna Modern Nightstand");
    }

    #[test]
    fn test_type_falls_back_to_category_name() {
        let mut synth = NameSynthesizer::default();
        let name = synth.synthesize("", CategoryTag::Dining);

        assert_eq!(name, "Carrara Modern Dining");
    }

    #[test]
    fn test_consecutive_identical_imports_get_distinct_names() {
        let mut synth = NameSynthesizer::default();
        let first = synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);
        let second = synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);

        assert_eq!(first, "Milano Velvet Platform Bed");
        assert_eq!(second, "Aurora Velvet Platform Bed");
    }

    #[test]
    fn test_full_rotation_is_unique() {
        let mut synth = NameSynthesizer::default();
        let mut seen = HashSet::new();

        for _ in 0..10 {
            let name = synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);
            assert!(seen.insert(name.clone()), "duplicate name: {}", name);
        }
        assert_eq!(synth.registry().used_count(), 10);
    }

    #[test]
    fn test_collision_takes_next_slot_and_advances_by_two() {
        let mut synth = NameSynthesizer::default();
        assert!(synth.reserve("Milano Velvet Platform Bed"));

        let detailed = synth.synthesize_detailed("Velvet Platform Bed", CategoryTag::Beds);

        assert_eq!(detailed.name, "Aurora Velvet Platform Bed");
        assert_eq!(detailed.collection.as_deref(), Some("Aurora"));
        assert!(detailed.rerouted);
        assert_eq!(synth.registry().counter(CategoryTag::Beds), 2);

        let next = synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);
        assert_eq!(next, "Torino Velvet Platform Bed");
    }

    #[test]
    fn test_counters_are_per_category() {
        let mut synth = NameSynthesizer::default();
        synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);
        synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);
        let sofa = synth.synthesize("Velvet Sofa", CategoryTag::Sofas);

        assert_eq!(sofa, "Sahara Velvet Sofa");
        assert_eq!(synth.registry().counter(CategoryTag::Beds), 2);
        assert_eq!(synth.registry().counter(CategoryTag::Sofas), 1);
    }

    #[test]
    fn test_rebuild_from_catalog_resumes_rotation() {
        let mut synth = NameSynthesizer::default();
        synth.rebuild_from_catalog(&[
            create_test_entry("Milano Velvet Platform Bed", CategoryTag::Beds),
            create_test_entry("Aurora Velvet Platform Bed", CategoryTag::Beds),
            create_test_entry("Sahara Velvet Sofa", CategoryTag::Sofas),
        ]);

        assert_eq!(synth.registry().counter(CategoryTag::Beds), 2);
        assert_eq!(synth.registry().counter(CategoryTag::Sofas), 1);
        assert!(synth.registry().contains("Aurora Velvet Platform Bed"));

        let name = synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);
        assert_eq!(name, "Torino Velvet Platform Bed");
    }

    #[test]
    fn test_rebuild_replaces_previous_state() {
        let mut synth = NameSynthesizer::default();
        synth.synthesize("Velvet Platform Bed", CategoryTag::Beds);
        synth.rebuild_from_catalog(&[]);

        assert_eq!(synth.registry().counter(CategoryTag::Beds), 0);
        assert_eq!(synth.registry().used_count(), 0);
    }

    #[test]
    fn test_empty_collection_list_uses_fallback() {
        let mut policy = NamingPolicy::default();
        policy.collections.retain(|c| c.category != CategoryTag::Tables);

        let mut synth = NameSynthesizer::new(
            LexicalNormalizer::default(),
            AttributeTables::default(),
            policy,
        );

        assert_eq!(synth.synthesize("Glass Coffee Table", CategoryTag::Tables), "Unicorn Glass Coffee Table");
    }

    #[test]
    fn test_no_words_at_all_still_names() {
        let policy = NamingPolicy {
            collections: vec![],
            fallback_words: vec![],
        };
        let mut synth = NameSynthesizer::new(
            LexicalNormalizer::default(),
            AttributeTables::default(),
            policy,
        );

        assert_eq!(synth.synthesize("Glass Coffee Table", CategoryTag::Tables), "Glass Coffee Table");
    }
}
