// 🎖️ Badge Tag - Promotional label shown on a catalog card
//
// Badges are computed from margin and cost when the entry is created and are
// never recomputed afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BadgeTag {
    New,
    Sale,
    #[serde(rename = "Best Seller")]
    BestSeller,
    Premium,
}

impl BadgeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTag::New => "New",
            BadgeTag::Sale => "Sale",
            BadgeTag::BestSeller => "Best Seller",
            BadgeTag::Premium => "Premium",
        }
    }
}

impl fmt::Display for BadgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "New" => Ok(BadgeTag::New),
            "Sale" => Ok(BadgeTag::Sale),
            "Best Seller" | "BestSeller" => Ok(BadgeTag::BestSeller),
            "Premium" => Ok(BadgeTag::Premium),
            other => Err(format!("Unknown badge: {}", other)),
        }
    }
}

/// Thresholds for the creation-time badge. `Sale` is never assigned here;
/// it is reserved for manual promotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgePolicy {
    /// Strictly above → Best Seller
    pub best_seller_margin: i64,
    /// Strictly above (source currency) → Premium
    pub premium_cost: f64,
}

impl Default for BadgePolicy {
    fn default() -> Self {
        BadgePolicy {
            best_seller_margin: 65,
            premium_cost: 400.0,
        }
    }
}

impl BadgePolicy {
    pub fn assign(&self, margin_percent: i64, cost: f64) -> BadgeTag {
        if margin_percent > self.best_seller_margin {
            BadgeTag::BestSeller
        } else if cost > self.premium_cost {
            BadgeTag::Premium
        } else {
            BadgeTag::New
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_precedence() {
        let policy = BadgePolicy::default();

        assert_eq!(policy.assign(82, 10.0), BadgeTag::BestSeller);
        assert_eq!(policy.assign(66, 900.0), BadgeTag::BestSeller);
        assert_eq!(policy.assign(65, 900.0), BadgeTag::Premium);
        assert_eq!(policy.assign(50, 400.0), BadgeTag::New);
        assert_eq!(policy.assign(0, 0.0), BadgeTag::New);
    }

    #[test]
    fn test_badge_display_matches_storefront_text() {
        assert_eq!(BadgeTag::BestSeller.to_string(), "Best Seller");
        assert_eq!(
            serde_json::to_string(&BadgeTag::BestSeller).unwrap(),
            "\"Best Seller\""
        );
    }

    #[test]
    fn test_badge_parse() {
        assert_eq!("Best Seller".parse::<BadgeTag>().unwrap(), BadgeTag::BestSeller);
        assert_eq!("Premium".parse::<BadgeTag>().unwrap(), BadgeTag::Premium);
        assert!("Exclusive".parse::<BadgeTag>().is_err());
    }
}
