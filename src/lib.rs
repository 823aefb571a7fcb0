// Catalog Curator - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod attributes;
pub mod config;
pub mod description;
pub mod entities;
pub mod error;
pub mod listing;
pub mod naming;
pub mod normalizer;
pub mod pipeline;
pub mod pricing;
pub mod quality;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use attributes::{AttributeTables, ProductAttributes};
pub use config::CurationConfig;
pub use description::DescriptionPool;
pub use entities::{BadgePolicy, BadgeTag, CatalogEntry, CategoryTag};
pub use error::{CurationError, CurationResult};
pub use listing::{load_listings_csv, RawListing};
pub use naming::{NameRegistry, NameSynthesizer, NamingPolicy};
pub use normalizer::LexicalNormalizer;
pub use pipeline::{BatchReport, CurationPipeline, Rejection};
pub use pricing::{PriceQuote, PricingEngine, PricingPolicy};
pub use quality::{ImageCurator, ImagePolicy, QualityPolicy, QualityScore, RejectionFilter};
pub use rules::{CategoryClassifier, CategoryRule, ClassificationResult};
pub use store::{
    delete_entry, fingerprint_exists, get_all_entries, get_entry, get_events_for_entry,
    insert_entries, insert_entry, open_database, setup_database, verify_count,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
