// 📦 Catalog Entry - A curated product ready for the storefront
//
// Created once at import time. There is no edit operation: an entry is either
// present in the catalog or deleted by id.

use super::{BadgeTag, CategoryTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identity (UUID)
    pub id: String,

    /// Title exactly as the marketplace listed it
    pub raw_title: String,

    /// Synthesized brand name (e.g., "Milano Velvet Platform Bed")
    pub curated_name: String,

    pub category: CategoryTag,

    pub cost_in_source_currency: f64,

    // ========================================================================
    // PRICING (whole destination-currency units)
    // ========================================================================
    pub retail_price: i64,
    pub was_price: i64,
    pub margin_percent: i64,
    pub profit_in_dest_currency: i64,

    pub images: Vec<String>,
    pub colors_text: String,
    pub sizes_text: String,
    pub badge: BadgeTag,

    /// Listing quality 0..=100 at import time
    #[serde(default)]
    pub quality_score: i64,

    pub description: String,
    pub source_url: String,
    pub created_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Fingerprint of the raw listing this entry came from.
    ///
    /// Two imports of the same listing share a fingerprint even though they
    /// get different ids and curated names.
    pub fn fingerprint(&self) -> String {
        listing_fingerprint(&self.raw_title, self.cost_in_source_currency, &self.source_url)
    }

    /// Discount shown next to the was price, in whole percent
    pub fn discount_percent(&self) -> i64 {
        if self.was_price <= 0 || self.retail_price <= 0 {
            return 0;
        }
        ((1.0 - self.retail_price as f64 / self.was_price as f64) * 100.0).round() as i64
    }
}

/// SHA-256 over title, cost and source URL
pub fn listing_fingerprint(raw_title: &str, cost: f64, source_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}", raw_title.trim(), cost, source_url.trim()));
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry(raw_title: &str, cost: f64) -> CatalogEntry {
        CatalogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            raw_title: raw_title.to_string(),
            curated_name: "Milano Velvet Platform Bed".to_string(),
            category: CategoryTag::Beds,
            cost_in_source_currency: cost,
            retail_price: 1599,
            was_price: 2099,
            margin_percent: 59,
            profit_in_dest_currency: 938,
            images: vec![],
            colors_text: String::new(),
            sizes_text: String::new(),
            badge: BadgeTag::New,
            quality_score: 58,
            description: String::new(),
            source_url: "https://example.com/item/1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fingerprint_is_stable_across_ids() {
        let a = create_test_entry("Velvet Platform Bed", 180.0);
        let b = create_test_entry("Velvet Platform Bed", 180.0);

        assert_ne!(a.id, b.id);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_cost() {
        let a = create_test_entry("Velvet Platform Bed", 180.0);
        let b = create_test_entry("Velvet Platform Bed", 181.0);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_discount_percent() {
        let entry = create_test_entry("Velvet Platform Bed", 180.0);
        assert_eq!(entry.discount_percent(), 24);

        let mut zeroed = entry.clone();
        zeroed.retail_price = 0;
        zeroed.was_price = 0;
        assert_eq!(zeroed.discount_percent(), 0);
    }
}
