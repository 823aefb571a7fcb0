// ✅ Quality Gates - Denylist, listing score and image hygiene
//
// The rejection filter runs on the RAW title, before normalization, so a
// phrase like "gaming chair" is still intact when it is checked.
//
// The quality score is advisory unless `QualityPolicy::enforce` is set: by
// default the denylist is the only hard gate.

use crate::entities::CategoryTag;
use crate::listing::RawListing;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// REJECTION FILTER
// ============================================================================

pub const DEFAULT_REJECT_PHRASES: &[&str] = &[
    "cheap", "budget", "economy", "wholesale lot", "clearance",
    "inflatable", "blow up", "bean bag",
    "kids cartoon", "student dorm", "disposable",
    "pet bed", "dog bed", "cat bed", "cat tree",
    "outdoor camping", "camping chair", "beach chair",
    "car seat", "massage chair", "gaming chair",
    "nail table", "salon", "barber", "tattoo",
    "3d print", "cardboard furniture",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RejectionFilter {
    pub phrases: Vec<String>,
}

impl RejectionFilter {
    pub fn new(phrases: Vec<String>) -> Self {
        RejectionFilter { phrases }
    }

    pub fn reject(&self, raw_title: &str) -> bool {
        self.rejection_reason(raw_title).is_some()
    }

    /// First denylist phrase found in the title
    pub fn rejection_reason(&self, raw_title: &str) -> Option<&str> {
        let title_lower = raw_title.to_lowercase();
        self.phrases
            .iter()
            .map(String::as_str)
            .find(|phrase| !phrase.is_empty() && title_lower.contains(&phrase.to_lowercase()))
    }
}

impl Default for RejectionFilter {
    fn default() -> Self {
        RejectionFilter::new(DEFAULT_REJECT_PHRASES.iter().map(|s| s.to_string()).collect())
    }
}

// ============================================================================
// IMAGE CURATOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePolicy {
    /// Case-insensitive patterns for thumbnails, icons and other non-product art
    pub reject_patterns: Vec<String>,
    pub max_images: usize,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        ImagePolicy {
            reject_patterns: [r"_50x50", r"_100x100", r"icon", r"logo", r"banner", r"avatar", r"\.gif$"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_images: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageCurator {
    reject: Vec<Regex>,
    size_suffix: Regex,
    max_images: usize,
}

impl ImageCurator {
    pub fn new(policy: &ImagePolicy) -> Result<Self, regex::Error> {
        let reject = policy
            .reject_patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ImageCurator {
            reject,
            size_suffix: Regex::new(r"_\d+x\d+")?,
            max_images: policy.max_images,
        })
    }

    /// Keep usable product images, upgraded to full size, in input order
    pub fn curate(&self, images: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();

        for img in images {
            if out.len() >= self.max_images {
                break;
            }

            let img = img.trim();
            if !img.starts_with("http") || img.len() < 10 {
                continue;
            }
            if self.reject.iter().any(|re| re.is_match(img)) {
                continue;
            }

            let mut url = self.size_suffix.replace_all(img, "").into_owned();
            if url.contains("alicdn.com") {
                url = url.replace(".webp", ".jpg");
            }

            if !out.contains(&url) {
                out.push(url);
            }
        }

        out
    }
}

// ============================================================================
// QUALITY SCORE
// ============================================================================

pub const DEFAULT_PREMIUM_MATERIALS: &[&str] = &[
    "velvet", "bouclé", "boucle", "linen", "leather", "genuine leather",
    "marble", "sintered stone", "sintered", "slate", "travertine", "granite",
    "solid wood", "oak", "walnut", "teak", "ash wood", "beech", "acacia",
    "brass", "gold", "chrome", "stainless steel", "brushed metal",
    "ceramic", "porcelain", "crystal", "glass", "tempered glass",
    "memory foam", "latex", "down", "feather",
    "italian", "european", "scandinavian", "nordic",
];

/// Minimum believable cost (source currency) for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostFloor {
    pub category: CategoryTag,
    pub min_cost: f64,
}

impl CostFloor {
    pub fn new(category: CategoryTag, min_cost: f64) -> Self {
        CostFloor { category, min_cost }
    }
}

/// Strictly above `threshold` → `points`. Bands are checked in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub threshold: f64,
    pub points: i64,
}

impl ScoreBand {
    pub fn new(threshold: f64, points: i64) -> Self {
        ScoreBand { threshold, points }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPolicy {
    /// Turn the score into a hard gate (floor, images, min score)
    pub enforce: bool,
    pub base_score: i64,
    pub min_score: i64,

    /// Every keyword found counts, overlapping ones included
    pub premium_materials: Vec<String>,
    pub points_per_material: i64,
    pub material_points_cap: i64,

    /// At least this many images → `many_images_points`
    pub many_images: usize,
    pub many_images_points: i64,
    /// Exactly one image → `single_image_points`
    pub single_image_points: i64,

    pub order_bands: Vec<ScoreBand>,
    pub rating_bands: Vec<ScoreBand>,
    /// Ratings strictly below this → `low_rating_points`
    pub low_rating: f64,
    pub low_rating_points: i64,

    pub cost_floors: Vec<CostFloor>,
    pub default_cost_floor: f64,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        QualityPolicy {
            enforce: false,
            base_score: 50,
            min_score: 40,
            premium_materials: DEFAULT_PREMIUM_MATERIALS.iter().map(|s| s.to_string()).collect(),
            points_per_material: 7,
            material_points_cap: 28,
            many_images: 3,
            many_images_points: 8,
            single_image_points: -3,
            order_bands: vec![ScoreBand::new(200.0, 12), ScoreBand::new(50.0, 7)],
            rating_bands: vec![ScoreBand::new(95.0, 8), ScoreBand::new(90.0, 4)],
            low_rating: 75.0,
            low_rating_points: -8,
            cost_floors: vec![
                CostFloor::new(CategoryTag::Beds, 60.0),
                CostFloor::new(CategoryTag::Sofas, 100.0),
                CostFloor::new(CategoryTag::Dining, 80.0),
                CostFloor::new(CategoryTag::Chairs, 25.0),
                CostFloor::new(CategoryTag::Tv, 40.0),
                CostFloor::new(CategoryTag::Wardrobes, 80.0),
                CostFloor::new(CategoryTag::Tables, 20.0),
                CostFloor::new(CategoryTag::Nightstands, 18.0),
                CostFloor::new(CategoryTag::Chaise, 60.0),
            ],
            default_cost_floor: 15.0,
        }
    }
}

/// Outcome of scoring one listing
#[derive(Debug, Clone, PartialEq)]
pub struct QualityScore {
    /// 0..=100
    pub score: i64,
    pub reasons: Vec<String>,

    /// First hard failure (cost floor, no images, low score), if any
    pub failure: Option<String>,
}

impl QualityScore {
    pub fn passes(&self) -> bool {
        self.failure.is_none()
    }
}

impl QualityPolicy {
    pub fn cost_floor(&self, category: CategoryTag) -> f64 {
        self.cost_floors
            .iter()
            .find(|f| f.category == category)
            .map(|f| f.min_cost)
            .unwrap_or(self.default_cost_floor)
    }

    /// Score a listing. `image_count` is the number of usable images after curation.
    pub fn evaluate(&self, listing: &RawListing, category: CategoryTag, image_count: usize) -> QualityScore {
        let title_lower = listing.title.to_lowercase();
        let mut score = self.base_score;
        let mut reasons = Vec::new();

        let materials = self
            .premium_materials
            .iter()
            .filter(|m| !m.is_empty() && title_lower.contains(&m.to_lowercase()))
            .count() as i64;
        if materials > 0 {
            score += (materials * self.points_per_material).min(self.material_points_cap);
            reasons.push(format!("{} premium material(s)", materials));
        }

        if image_count >= self.many_images {
            score += self.many_images_points;
        } else if image_count == 1 {
            score += self.single_image_points;
        }

        let orders = listing.order_count as f64;
        if let Some(band) = self.order_bands.iter().find(|b| orders > b.threshold) {
            score += band.points;
            reasons.push(format!("Demand ({} orders)", listing.order_count));
        }

        if let Some(rating) = parse_rating(&listing.rating_text) {
            if let Some(band) = self.rating_bands.iter().find(|b| rating > b.threshold) {
                score += band.points;
            } else if rating < self.low_rating {
                score += self.low_rating_points;
                reasons.push(format!("Low rating ({})", rating));
            }
        }

        let score = score.clamp(0, 100);

        let cost = listing.cost_in_source_currency;
        let floor = self.cost_floor(category);
        let failure = if cost > 0.0 && cost < floor {
            Some(format!("Too cheap: {:.0} < {:.0} min for {}", cost, floor, category))
        } else if image_count == 0 {
            Some("No images".to_string())
        } else if score < self.min_score {
            Some(format!("Score {}/100 below threshold", score))
        } else {
            None
        };

        QualityScore {
            score,
            reasons,
            failure,
        }
    }
}

/// "96.5%" → 96.5. Anything unparseable is no rating at all.
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim().trim_end_matches('%').trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

// ============================================================================
// TESTS
// ============================================================================
