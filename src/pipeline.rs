// 🧵 Curation Pipeline - Raw listing → catalog entry
//
// Order of stages:
//   usable title? → denylist → category → images → quality score → name
//   → price → badge → description
//
// Everything that can refuse a listing runs before the name synthesizer, so a
// refused listing never advances the rotation.
//
// The name registry and the description RNG are the only mutable state; both
// sit behind a Mutex so concurrent imports cannot interleave a counter
// read-modify-write.

use crate::config::CurationConfig;
use crate::description::DescriptionPool;
use crate::entities::{BadgePolicy, CatalogEntry};
use crate::error::{CurationError, CurationResult};
use crate::listing::RawListing;
use crate::naming::{NameRegistry, NameSynthesizer};
use crate::pricing::PricingEngine;
use crate::quality::{ImageCurator, QualityPolicy, RejectionFilter};
use crate::rules::CategoryClassifier;
use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct CurationPipeline {
    rejection: RejectionFilter,
    quality: QualityPolicy,
    classifier: CategoryClassifier,
    images: ImageCurator,
    pricing: PricingEngine,
    badges: BadgePolicy,
    descriptions: DescriptionPool,
    names: Mutex<NameSynthesizer>,
    rng: Mutex<StdRng>,
}

impl CurationPipeline {
    /// Production pipeline: description choice seeded from OS entropy
    pub fn new(config: CurationConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible pipeline for tests and dry runs
    pub fn with_seed(config: CurationConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CurationConfig, rng: StdRng) -> Result<Self> {
        let images = ImageCurator::new(&config.images).context("Invalid image reject pattern")?;
        let names = NameSynthesizer::new(config.normalizer, config.attributes, config.naming);

        Ok(CurationPipeline {
            rejection: config.rejection,
            quality: config.quality,
            classifier: config.classifier,
            images,
            pricing: PricingEngine::new(config.pricing),
            badges: config.badges,
            descriptions: config.descriptions,
            names: Mutex::new(names),
            rng: Mutex::new(rng),
        })
    }

    /// Replay persisted entries into the name registry
    pub fn rebuild_from_catalog(&self, entries: &[CatalogEntry]) {
        let mut names = self.names();
        names.rebuild_from_catalog(entries);
        info!(
            entries = entries.len(),
            used_names = names.registry().used_count(),
            "Name registry rebuilt"
        );
    }

    /// Copy of the current registry state
    pub fn registry(&self) -> NameRegistry {
        self.names().registry().clone()
    }

    pub fn curate(&self, listing: &RawListing) -> CurationResult<CatalogEntry> {
        if !listing.has_usable_title() {
            warn!(title = %listing.title, "Incomplete extraction");
            return Err(CurationError::IncompleteExtraction);
        }

        let raw_title = listing.title.trim();

        if let Some(phrase) = self.rejection.rejection_reason(raw_title) {
            info!(title = raw_title, phrase, "Rejected");
            return Err(CurationError::Rejected {
                phrase: phrase.to_string(),
            });
        }

        let category = self.classifier.classify(raw_title);
        let images = self.images.curate(&listing.image_urls);

        let quality = self.quality.evaluate(listing, category, images.len());
        if let Some(reason) = &quality.failure {
            if self.quality.enforce {
                info!(title = raw_title, reason = %reason, score = quality.score, "Below quality bar");
                return Err(CurationError::BelowQuality {
                    reason: reason.clone(),
                    score: quality.score,
                });
            }
            debug!(title = raw_title, reason = %reason, score = quality.score, "Quality gate not enforced");
        }

        let synthesized = self.names().synthesize_detailed(raw_title, category);
        debug!(
            category = %category,
            material = %synthesized.attributes.material,
            style = %synthesized.attributes.style,
            product_type = %synthesized.attributes.product_type,
            rerouted = synthesized.rerouted,
            "Attributes extracted"
        );

        let cost = listing.cost_in_source_currency;
        let quote = self.pricing.price(cost, raw_title);
        if quote.is_degenerate() {
            warn!(title = raw_title, cost, "Unknown cost, pricing zeroed");
        }

        let badge = self.badges.assign(quote.margin_percent, cost);

        let description = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            self.descriptions
                .describe(&synthesized.name, raw_title, category, &mut *rng)
        };

        let entry = CatalogEntry {
            id: Uuid::new_v4().to_string(),
            raw_title: raw_title.to_string(),
            curated_name: synthesized.name,
            category,
            cost_in_source_currency: cost,
            retail_price: quote.retail_price,
            was_price: quote.was_price,
            margin_percent: quote.margin_percent,
            profit_in_dest_currency: quote.profit_in_dest_currency,
            images,
            colors_text: listing.colors_text.clone(),
            sizes_text: listing.sizes_text.clone(),
            badge,
            quality_score: quality.score,
            description,
            source_url: listing.source_url.clone(),
            created_at: Utc::now(),
        };

        info!(
            name = %entry.curated_name,
            category = %entry.category,
            retail = entry.retail_price,
            margin = entry.margin_percent,
            score = entry.quality_score,
            "Curated"
        );

        Ok(entry)
    }

    pub fn curate_batch(&self, listings: &[RawListing]) -> BatchReport {
        let mut report = BatchReport {
            input_count: listings.len(),
            ..Default::default()
        };

        for listing in listings {
            match self.curate(listing) {
                Ok(entry) => report.curated.push(entry),
                Err(CurationError::Rejected { phrase }) => report.rejected.push(Rejection {
                    title: listing.title.clone(),
                    reason: phrase,
                }),
                Err(CurationError::BelowQuality { reason, .. }) => {
                    report.below_quality.push(Rejection {
                        title: listing.title.clone(),
                        reason,
                    })
                }
                Err(CurationError::IncompleteExtraction) => report.incomplete += 1,
            }
        }

        report
    }

    /// Curate only listings not already stored and not repeated earlier in
    /// the batch. Skipped listings never reach the name synthesizer.
    pub fn curate_new<F>(&self, listings: &[RawListing], mut is_stored: F) -> Result<BatchReport>
    where
        F: FnMut(&str) -> Result<bool>,
    {
        let mut seen = HashSet::new();
        let mut fresh = Vec::with_capacity(listings.len());

        for listing in listings {
            let fingerprint = listing.fingerprint();
            if !seen.insert(fingerprint.clone()) || is_stored(&fingerprint)? {
                debug!(title = %listing.title, "Already in catalog, skipped");
                continue;
            }
            fresh.push(listing.clone());
        }

        let mut report = self.curate_batch(&fresh);
        report.input_count = listings.len();
        report.duplicates = listings.len() - fresh.len();
        Ok(report)
    }

    fn names(&self) -> MutexGuard<'_, NameSynthesizer> {
        self.names.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ============================================================================
// BATCH REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub title: String,
    /// Denylist phrase or failed quality gate
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub input_count: usize,
    pub curated: Vec<CatalogEntry>,
    pub rejected: Vec<Rejection>,
    pub below_quality: Vec<Rejection>,
    pub incomplete: usize,
    /// Listings already in the catalog, skipped before curation
    pub duplicates: usize,
}

impl BatchReport {
    pub fn pass_count(&self) -> usize {
        self.curated.len()
    }

    /// Mean margin over priced entries (unknown costs excluded)
    pub fn average_margin(&self) -> f64 {
        let priced: Vec<i64> = self
            .curated
            .iter()
            .filter(|e| e.retail_price > 0)
            .map(|e| e.margin_percent)
            .collect();

        if priced.is_empty() {
            return 0.0;
        }
        priced.iter().sum::<i64>() as f64 / priced.len() as f64
    }

    pub fn average_score(&self) -> f64 {
        if self.curated.is_empty() {
            return 0.0;
        }
        self.curated.iter().map(|e| e.quality_score).sum::<i64>() as f64 / self.curated.len() as f64
    }

    pub fn summary(&self) -> String {
        format!(
            "{} listings: {} curated, {} rejected, {} below quality, {} incomplete, {} duplicates | avg margin {:.1}% | avg score {:.1}/100",
            self.input_count,
            self.pass_count(),
            self.rejected.len(),
            self.below_quality.len(),
            self.incomplete,
            self.duplicates,
            self.average_margin(),
            self.average_score()
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
