// 📥 Raw Listings - What the extraction front-end hands us
//
// CSV layout (one listing per row):
//   title,cost,images,colors,sizes,orders,rating,source_url
// `images` is a single column with URLs separated by `|`.

use crate::entities::listing_fingerprint;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Titles a failed page scrape produces instead of the product name
pub const PLACEHOLDER_TITLES: &[&str] = &["aliexpress", "product", "untitled", "n/a"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawListing {
    pub title: String,

    /// 0 means the cost is unknown
    pub cost_in_source_currency: f64,
    pub image_urls: Vec<String>,
    pub colors_text: String,
    pub sizes_text: String,
    pub order_count: u64,
    pub rating_text: String,
    pub source_url: String,
}

impl RawListing {
    pub fn new(title: &str, cost: f64) -> Self {
        RawListing {
            title: title.to_string(),
            cost_in_source_currency: cost,
            ..Default::default()
        }
    }

    /// Same fingerprint the stored entry will carry
    pub fn fingerprint(&self) -> String {
        listing_fingerprint(self.title.trim(), self.cost_in_source_currency, &self.source_url)
    }

    /// False for blank titles and scrape placeholders
    pub fn has_usable_title(&self) -> bool {
        let title = self.title.trim();
        !title.is_empty()
            && !PLACEHOLDER_TITLES
                .iter()
                .any(|p| title.eq_ignore_ascii_case(p))
    }
}

// ============================================================================
// CSV LOADING
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListingRow {
    title: String,
    #[serde(default)]
    cost: Option<f64>,
    #[serde(default)]
    images: String,
    #[serde(default)]
    colors: String,
    #[serde(default)]
    sizes: String,
    #[serde(default)]
    orders: Option<u64>,
    #[serde(default)]
    rating: String,
    #[serde(default)]
    source_url: String,
}

impl From<ListingRow> for RawListing {
    fn from(row: ListingRow) -> Self {
        RawListing {
            title: row.title,
            cost_in_source_currency: row.cost.unwrap_or(0.0),
            image_urls: split_images(&row.images),
            colors_text: row.colors,
            sizes_text: row.sizes,
            order_count: row.orders.unwrap_or(0),
            rating_text: row.rating,
            source_url: row.source_url,
        }
    }
}

fn split_images(field: &str) -> Vec<String> {
    field
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_listings_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawListing>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open listings CSV: {}", path.display()))?;

    let mut listings = Vec::new();
    for (idx, row) in reader.deserialize::<ListingRow>().enumerate() {
        // Row 1 is the header
        let row = row.with_context(|| format!("Malformed listing at row {}", idx + 2))?;
        listings.push(RawListing::from(row));
    }

    Ok(listings)
}

// ============================================================================
// TESTS
// ============================================================================
