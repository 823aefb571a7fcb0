// 💰 Pricing Engine - Landed cost → retail, was price, margin
//
// cost (source currency)
//   × exchange rate
//   × tier markup (× at most one material premium)
//   → psychological rounding (…99 / …49)
//   → floor
//
// All outputs are whole destination-currency units.

use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// POLICY TABLES
// ============================================================================

/// Half-open cost range `[min, max)` and its markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupTier {
    pub min: f64,
    pub max: f64,
    pub multiplier: f64,
}

impl MarkupTier {
    pub fn new(min: f64, max: f64, multiplier: f64) -> Self {
        MarkupTier { min, max, multiplier }
    }

    pub fn contains(&self, cost: f64) -> bool {
        self.min <= cost && cost < self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPremium {
    pub keyword: String,
    pub factor: f64,
}

impl MaterialPremium {
    pub fn new(keyword: &str, factor: f64) -> Self {
        MaterialPremium {
            keyword: keyword.to_string(),
            factor,
        }
    }
}

/// Values at or above `min_value` round to the nearest `step`, minus one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundingBand {
    pub min_value: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WasPricePolicy {
    /// Costs below this get `low_cost_ratio`, the rest `high_cost_ratio`
    pub cost_threshold: f64,
    pub low_cost_ratio: f64,
    pub high_cost_ratio: f64,
    pub step: f64,
}

impl Default for WasPricePolicy {
    fn default() -> Self {
        WasPricePolicy {
            cost_threshold: 200.0,
            low_cost_ratio: 1.30,
            high_cost_ratio: 1.25,
            step: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Source → destination currency (USD → AED)
    pub exchange_rate: f64,
    pub tiers: Vec<MarkupTier>,
    pub default_markup: f64,
    pub material_premiums: Vec<MaterialPremium>,

    /// Checked in order; the first band whose `min_value` the raw value reaches applies
    pub rounding: Vec<RoundingBand>,
    pub min_retail_price: i64,
    pub was_price: WasPricePolicy,

    /// Raw retail values above this are out of range and quote as zero
    pub max_raw_value: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            exchange_rate: 3.67,
            tiers: vec![
                MarkupTier::new(0.0, 50.0, 3.5),
                MarkupTier::new(50.0, 150.0, 3.0),
                MarkupTier::new(150.0, 400.0, 2.5),
                MarkupTier::new(400.0, 800.0, 2.2),
                MarkupTier::new(800.0, 1_000_000.0, 2.0),
            ],
            default_markup: 2.5,
            material_premiums: vec![
                MaterialPremium::new("marble", 1.15),
                MaterialPremium::new("sintered", 1.12),
                MaterialPremium::new("italian", 1.15),
                MaterialPremium::new("leather", 1.10),
                MaterialPremium::new("walnut", 1.10),
                MaterialPremium::new("teak", 1.12),
                MaterialPremium::new("brass", 1.08),
                MaterialPremium::new("oak", 1.06),
            ],
            rounding: vec![
                RoundingBand { min_value: 1000.0, step: 100.0 },
                RoundingBand { min_value: 200.0, step: 50.0 },
                RoundingBand { min_value: f64::MIN, step: 10.0 },
            ],
            min_retail_price: 199,
            was_price: WasPricePolicy::default(),
            max_raw_value: 1e12,
        }
    }
}

// ============================================================================
// PRICE QUOTE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub retail_price: i64,
    pub was_price: i64,
    pub margin_percent: i64,
    pub profit_in_dest_currency: i64,
}

impl PriceQuote {
    /// True for the zeroed quote of an unknown / non-positive cost
    pub fn is_degenerate(&self) -> bool {
        *self == PriceQuote::default()
    }
}

/// How a quote was reached
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub base_markup: f64,
    /// Premium keyword and factor, if one applied
    pub premium: Option<(String, f64)>,
    pub markup: f64,
    pub landed_cost: f64,
    pub raw_value: f64,
    pub quote: PriceQuote,
}

impl PriceBreakdown {
    fn zeroed() -> Self {
        PriceBreakdown {
            base_markup: 0.0,
            premium: None,
            markup: 0.0,
            landed_cost: 0.0,
            raw_value: 0.0,
            quote: PriceQuote::default(),
        }
    }
}

// ============================================================================
// PRICING ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    policy: PricingPolicy,
}

impl PricingEngine {
    pub fn new(policy: PricingPolicy) -> Self {
        PricingEngine { policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Quote for a cost in source currency and the RAW title
    pub fn price(&self, cost: f64, raw_title: &str) -> PriceQuote {
        self.breakdown(cost, raw_title).quote
    }

    pub fn breakdown(&self, cost: f64, raw_title: &str) -> PriceBreakdown {
        // Also catches NaN
        if !(cost > 0.0) || !cost.is_finite() {
            return PriceBreakdown::zeroed();
        }

        let base_markup = self.base_markup(cost);
        let premium = self.premium(raw_title);
        let markup = match &premium {
            Some((_, factor)) => base_markup * factor,
            None => base_markup,
        };

        let landed_cost = cost * self.policy.exchange_rate;
        let raw_value = landed_cost * markup;

        if !raw_value.is_finite() || raw_value > self.policy.max_raw_value {
            warn!(cost, raw_value, "Price out of range, quote zeroed");
            return PriceBreakdown::zeroed();
        }

        let retail_price = self.round_psychological(raw_value).max(self.policy.min_retail_price);
        let was_price = self.was_price(cost, retail_price);

        let (margin_percent, profit_in_dest_currency) = if retail_price > 0 {
            (
                ((1.0 - landed_cost / retail_price as f64) * 100.0).round() as i64,
                (retail_price as f64 - landed_cost).round() as i64,
            )
        } else {
            (0, 0)
        };

        PriceBreakdown {
            base_markup,
            premium,
            markup,
            landed_cost,
            raw_value,
            quote: PriceQuote {
                retail_price,
                was_price,
                margin_percent,
                profit_in_dest_currency,
            },
        }
    }

    /// First tier containing the cost, else the default markup
    pub fn base_markup(&self, cost: f64) -> f64 {
        self.policy
            .tiers
            .iter()
            .find(|tier| tier.contains(cost))
            .map(|tier| tier.multiplier)
            .unwrap_or(self.policy.default_markup)
    }

    /// At most one premium: the first keyword in table order
    pub fn premium(&self, raw_title: &str) -> Option<(String, f64)> {
        let title_lower = raw_title.to_lowercase();
        self.policy
            .material_premiums
            .iter()
            .find(|p| !p.keyword.is_empty() && title_lower.contains(&p.keyword.to_lowercase()))
            .map(|p| (p.keyword.clone(), p.factor))
    }

    pub fn round_psychological(&self, value: f64) -> i64 {
        let step = self
            .policy
            .rounding
            .iter()
            .find(|band| value >= band.min_value)
            .map(|band| band.step)
            .unwrap_or(10.0);

        round_to_step(value, step) - 1
    }

    /// Derived from the already-rounded retail price, never below it
    fn was_price(&self, cost: f64, retail_price: i64) -> i64 {
        let policy = &self.policy.was_price;
        let ratio = if cost < policy.cost_threshold {
            policy.low_cost_ratio
        } else {
            policy.high_cost_ratio
        };

        let was = round_to_step(retail_price as f64 * ratio, policy.step) - 1;
        was.max(retail_price)
    }
}

fn round_to_step(value: f64, step: f64) -> i64 {
    if step <= 0.0 {
        return value.round() as i64;
    }
    ((value / step).round() * step) as i64
}

// ============================================================================
// TESTS
// ============================================================================
