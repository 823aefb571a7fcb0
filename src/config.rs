// ⚙️ Curation Config - Every table and threshold in one document
//
// Each section defaults to the production tables, so a JSON file only needs
// to mention what it overrides:
//
//   { "pricing": { "exchange_rate": 3.75 }, "badges": { "premium_cost": 500 } }

use crate::attributes::AttributeTables;
use crate::description::DescriptionPool;
use crate::entities::BadgePolicy;
use crate::naming::NamingPolicy;
use crate::normalizer::LexicalNormalizer;
use crate::pricing::PricingPolicy;
use crate::quality::{ImagePolicy, QualityPolicy, RejectionFilter};
use crate::rules::CategoryClassifier;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "CURATOR_CONFIG";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    pub rejection: RejectionFilter,
    pub quality: QualityPolicy,
    pub images: ImagePolicy,
    pub normalizer: LexicalNormalizer,
    pub classifier: CategoryClassifier,
    pub attributes: AttributeTables,
    pub naming: NamingPolicy,
    pub pricing: PricingPolicy,
    pub badges: BadgePolicy,
    pub descriptions: DescriptionPool,
}

impl CurationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config JSON")
    }

    /// Explicit path first, then `CURATOR_CONFIG`, then built-in defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }
}
